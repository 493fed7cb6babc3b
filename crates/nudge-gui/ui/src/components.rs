use gloo::timers::future::TimeoutFuture;
use nudge_shared::chat::respond;
use nudge_shared::notify::{REMINDER_DISMISS_AFTER, REMINDER_TITLE, Reminder};
use nudge_shared::task::Statistics;
use nudge_shared::theme::themes_by_category;
use web_sys::HtmlInputElement;
use yew::{
    AttrValue, Callback, Html, KeyboardEvent, MouseEvent, NodeRef, Properties, TargetCast,
    classes, function_component, html, use_effect_with, use_state,
};

#[derive(Properties, PartialEq)]
pub struct NotificationBellProps {
    pub count: u64,
    pub node_ref: NodeRef,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(NotificationBell)]
pub fn notification_bell(props: &NotificationBellProps) -> Html {
    html! {
        <button id="notif-btn" class="btn notif-btn" ref={props.node_ref.clone()} onclick={props.onclick.clone()} title="Notifications">
            { "🔔" }
            <span id="notif-count" class={classes!("notif-count", (props.count == 0).then_some("empty"))}>
                { props.count }
            </span>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct NotificationDropdownProps {
    /// Already escaped list markup.
    pub markup: String,
    pub style: String,
    pub node_ref: NodeRef,
}

#[function_component(NotificationDropdown)]
pub fn notification_dropdown(props: &NotificationDropdownProps) -> Html {
    html! {
        <div id="notif-dropdown" class="notif-dropdown" ref={props.node_ref.clone()} style={props.style.clone()}>
            { Html::from_html_unchecked(AttrValue::from(props.markup.clone())) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ReminderModalProps {
    pub reminder: Reminder,
    pub on_dismiss: Callback<()>,
}

#[function_component(ReminderModal)]
pub fn reminder_modal(props: &ReminderModalProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with((), move |_| {
            let millis = u32::try_from(REMINDER_DISMISS_AFTER.as_millis()).unwrap_or(u32::MAX);
            wasm_bindgen_futures::spawn_local(async move {
                TimeoutFuture::new(millis).await;
                on_dismiss.emit(());
            });
            || ()
        });
    }

    let reminder = &props.reminder;
    let on_close = props.on_dismiss.reform(|_: MouseEvent| ());

    html! {
        <div class="modal-backdrop reminder-modal">
            <div class="modal">
                <div class="modal-header">
                    <span>{ format!("🔔 {REMINDER_TITLE}") }</span>
                    <button class="btn close" onclick={on_close}>{ "×" }</button>
                </div>
                <div class="modal-body">
                    <h3>{ &reminder.title }</h3>
                    <p>{ &reminder.description }</p>
                    <p>
                        <strong>{ "Priority: " }</strong>
                        <span class={reminder.priority.css_class()}>{ reminder.priority.as_str() }</span>
                    </p>
                    {
                        if let Some(time) = reminder.due_time.as_deref() {
                            html! { <p><strong>{ "Due: " }</strong>{ time }</p> }
                        } else {
                            html! {}
                        }
                    }
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ThemeMenuProps {
    pub active: Option<&'static str>,
    pub style: String,
    pub node_ref: NodeRef,
    pub on_pick: Callback<&'static str>,
}

#[function_component(ThemeMenu)]
pub fn theme_menu(props: &ThemeMenuProps) -> Html {
    html! {
        <div id="theme-menu" class="theme-menu" ref={props.node_ref.clone()} style={props.style.clone()}>
            <h4>{ "Choose Your Theme" }</h4>
            {
                for themes_by_category().into_iter().map(|(category, themes)| html! {
                    <div class="theme-category">
                        <div class="theme-category-title">{ format!("{} {}", category.icon(), category.label()) }</div>
                        {
                            for themes.into_iter().map(|theme| {
                                let id = theme.id;
                                let selected = props.active == Some(id);
                                let on_pick = props.on_pick.clone();
                                html! {
                                    <div
                                        class={classes!("theme-option", format!("theme-{id}"), selected.then_some("selected"))}
                                        onclick={move |_| on_pick.emit(id)}
                                    >
                                        <div class="theme-preview" style={format!("background: {};", theme.palette.bg_primary)}></div>
                                        <label>{ theme.name }</label>
                                        { if selected { "✓" } else { "" } }
                                    </div>
                                }
                            })
                        }
                    </div>
                })
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WordModalProps {
    pub message: &'static str,
    pub on_close: Callback<()>,
}

#[function_component(WordModal)]
pub fn word_modal(props: &WordModalProps) -> Html {
    let on_close = props.on_close.reform(|_: MouseEvent| ());
    html! {
        <div class="modal-backdrop word-modal">
            <div class="modal">
                <div class="modal-header">
                    <span>{ "🌟 Word of the Day" }</span>
                    <button class="btn close" onclick={on_close}>{ "×" }</button>
                </div>
                <div class="modal-body word-text">{ props.message }</div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChatModalProps {
    pub on_close: Callback<()>,
}

#[function_component(ChatModal)]
pub fn chat_modal(props: &ChatModalProps) -> Html {
    let history = use_state(Vec::<(String, &'static str)>::new);
    let draft = use_state(String::new);

    let submit = {
        let history = history.clone();
        let draft = draft.clone();
        Callback::from(move |()| {
            let text = draft.trim().to_string();
            if text.is_empty() {
                return;
            }
            let mut next = (*history).clone();
            next.push((text.clone(), respond(&text)));
            history.set(next);
            draft.set(String::new());
        })
    };

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |event: yew::InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            draft.set(input.value());
        })
    };

    let on_keydown = {
        let submit = submit.clone();
        Callback::from(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                event.prevent_default();
                submit.emit(());
            }
        })
    };

    let on_send = submit.reform(|_: MouseEvent| ());
    let on_close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="modal-backdrop chat-modal">
            <div class="modal">
                <div class="modal-header">
                    <span>{ "💬 Productivity Assistant" }</span>
                    <button class="btn close" onclick={on_close}>{ "×" }</button>
                </div>
                <div class="modal-body chat-messages">
                    <div class="chat-message bot">{ respond("hello") }</div>
                    {
                        for history.iter().map(|(question, answer)| html! {
                            <>
                                <div class="chat-message user">{ question }</div>
                                <div class="chat-message bot">{ *answer }</div>
                            </>
                        })
                    }
                </div>
                <div class="chat-input">
                    <input
                        type="text"
                        placeholder="Ask me anything about productivity..."
                        value={(*draft).clone()}
                        oninput={on_input}
                        onkeydown={on_keydown}
                    />
                    <button class="btn" onclick={on_send}>{ "Send" }</button>
                </div>
            </div>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatsState {
    Loading,
    Ready(Statistics),
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub struct StatsModalProps {
    pub state: StatsState,
    pub on_close: Callback<()>,
}

#[function_component(StatsModal)]
pub fn stats_modal(props: &StatsModalProps) -> Html {
    let on_close = props.on_close.reform(|_: MouseEvent| ());
    let body = match &props.state {
        StatsState::Loading => html! { <div class="muted">{ "Loading…" }</div> },
        StatsState::Failed(error) => html! {
            <div class="error">{ format!("Could not load statistics: {error}") }</div>
        },
        StatsState::Ready(stats) => html! {
            <div class="stats-grid">
                <div class="stats-card"><div class="stats-value">{ stats.tasks_completed_today }</div><div>{ "Today" }</div></div>
                <div class="stats-card"><div class="stats-value">{ stats.tasks_completed_this_week }</div><div>{ "This week" }</div></div>
                <div class="stats-card"><div class="stats-value">{ stats.total_completed }</div><div>{ "All time" }</div></div>
            </div>
        },
    };

    html! {
        <div class="modal-backdrop stats-modal">
            <div class="modal">
                <div class="modal-header">
                    <span>{ "📊 Your Statistics" }</span>
                    <button class="btn close" onclick={on_close}>{ "×" }</button>
                </div>
                <div class="modal-body">{ body }</div>
            </div>
        </div>
    }
}
