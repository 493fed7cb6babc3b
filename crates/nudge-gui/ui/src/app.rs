pub mod browser;
mod view;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::Local;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use gloo::timers::future::TimeoutFuture;
use nudge_shared::context::AppContext;
use nudge_shared::daily::{
  AUTO_CLOSE_AFTER,
  AUTO_SHOW_DELAY,
  DailyGate,
  message_for_date
};
use nudge_shared::dropdown::dropdown_position;
use nudge_shared::notify::{
  Backend,
  COUNT_POLL_PERIOD,
  DUE_POLL_PERIOD,
  DropdownToggle,
  NotificationPoller,
  apply_count_result,
  apply_dropdown_result,
  apply_due_result,
  close_dropdown,
  init_desktop,
  start_dropdown_toggle
};
use nudge_shared::schedule::Scheduler;
use nudge_shared::theme::ThemeEngine;
use wasm_bindgen::JsCast;
use yew::{
  Callback,
  Html,
  MouseEvent,
  NodeRef,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_node_ref,
  use_reducer,
  use_state
};

use self::browser::{
  DocumentStyle,
  LocalStorageStore,
  anchor_rect,
  mark_task_row,
  page_filter,
  scroll_offset,
  update_stat_counters
};
use self::view::{
  PageView,
  ReminderAction,
  ReminderStack
};
use crate::api::FetchBackend;
use crate::components::{
  ChatModal,
  NotificationBell,
  NotificationDropdown,
  ReminderModal,
  StatsModal,
  StatsState,
  ThemeMenu,
  WordModal
};

/// How often the page checks the
/// scheduler for due polls.
const TICK_MS: u32 = 250;

type Poller =
  NotificationPoller<FetchBackend>;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Job {
  DuePoll,
  CountPoll
}

fn elapsed_since(start_ms: f64) -> Duration {
  let elapsed =
    (js_sys::Date::now() - start_ms)
      .max(0.0);
  Duration::from_millis(elapsed as u64)
}

fn millis(duration: Duration) -> u32 {
  u32::try_from(duration.as_millis())
    .unwrap_or(u32::MAX)
}

/// Runs one poll. The reconciliation
/// happens after the request completes,
/// so no borrow is held across the
/// await.
fn run_job(
  job: Job,
  poller: Rc<Poller>,
  ctx: Rc<RefCell<AppContext>>,
  mut view: PageView
) {
  wasm_bindgen_futures::spawn_local(
    async move {
      match job {
        | Job::DuePoll => {
          let result = poller
            .backend()
            .fetch_due_tasks()
            .await;
          if let Ok(shown) = apply_due_result(
            &mut ctx.borrow_mut(),
            &mut view,
            result
          ) {
            tracing::debug!(
              shown,
              "due poll finished"
            );
          }
        }
        | Job::CountPoll => {
          let result = poller
            .backend()
            .fetch_count(false)
            .await;
          if let Ok(count) =
            apply_count_result(
              &mut ctx.borrow_mut(),
              &mut view,
              result
            )
          {
            tracing::debug!(
              count,
              "count poll finished"
            );
          }
        }
      }
    }
  );
}

fn placement_style(
  anchor: &NodeRef
) -> String {
  anchor
    .cast::<web_sys::Element>()
    .map(|element| {
      dropdown_position(
        anchor_rect(&element),
        scroll_offset()
      )
      .style()
    })
    .unwrap_or_default()
}

fn contains_target(
  node_ref: &NodeRef,
  target: Option<&web_sys::Node>
) -> bool {
  match (node_ref.get(), target) {
    | (Some(node), Some(target)) => {
      node.contains(Some(target))
    }
    | _ => false
  }
}

/// Toggles for checkboxes inside a
/// `[data-task-id]` row of the host page.
fn handle_task_checkbox(
  event: &web_sys::Event,
  poller: Rc<Poller>
) {
  let Some(input) = event
    .target()
    .and_then(|target| {
      target
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()
    })
  else {
    return;
  };
  if input.type_() != "checkbox" {
    return;
  }

  let Some(task_id) = input
    .closest("[data-task-id]")
    .ok()
    .flatten()
    .and_then(|row| {
      row.get_attribute("data-task-id")
    })
    .and_then(|raw| {
      raw.trim().parse::<u64>().ok()
    })
  else {
    return;
  };

  let completed = input.checked();
  wasm_bindgen_futures::spawn_local(
    async move {
      match poller
        .toggle_task(task_id, completed)
        .await
      {
        | Ok(response) => {
          let completed = response
            .completed
            .unwrap_or(completed);
          mark_task_row(task_id, completed);
          update_stat_counters(completed);
        }
        | Err(_) => {
          input.set_checked(!completed);
        }
      }
    }
  );
}

#[function_component(App)]
pub fn app() -> Html {
  let ctx =
    use_mut_ref(AppContext::new);
  let poller = use_memo((), |_| {
    NotificationPoller::new(FetchBackend)
  });

  let badge = use_state(|| 0_u64);
  let dropdown =
    use_state(|| None::<(String, String)>);
  let reminders =
    use_reducer(ReminderStack::default);
  let active_theme =
    use_state(|| None::<&'static str>);
  let theme_menu =
    use_state(|| None::<String>);
  let word =
    use_state(|| None::<&'static str>);
  let chat_open = use_state(|| false);
  let stats =
    use_state(|| None::<StatsState>);

  let bell_ref = use_node_ref();
  let dropdown_ref = use_node_ref();
  let theme_btn_ref = use_node_ref();
  let theme_menu_ref = use_node_ref();

  let view = {
    let reminders =
      reminders.dispatcher();
    let badge = badge.setter();
    let dropdown = dropdown.setter();
    let bell_ref = bell_ref.clone();
    PageView {
      on_reminder: Callback::from(
        move |reminder| {
          reminders.dispatch(
            ReminderAction::Push(reminder)
          );
        }
      ),
      on_badge:    Callback::from(
        move |count| badge.set(count)
      ),
      on_dropdown: Callback::from(
        move |markup: Option<String>| {
          dropdown.set(markup.map(|markup| {
            (
              markup,
              placement_style(&bell_ref)
            )
          }));
        }
      ),
      filter:      page_filter()
    }
  };

  {
    let ctx = ctx.clone();
    let poller = poller.clone();
    let view = view.clone();
    let active_theme =
      active_theme.setter();
    use_effect_with((), move |_| {
      let theme = ThemeEngine::new(
        DocumentStyle,
        LocalStorageStore
      )
      .load_saved_theme(
        &mut ctx.borrow_mut()
      );
      active_theme.set(Some(theme.id));

      let permission =
        init_desktop(&mut view.clone());
      tracing::info!(
        theme = theme.id,
        permission = permission.label(),
        "page session started"
      );

      let scheduler = Rc::new(
        RefCell::new(Scheduler::new())
      );
      {
        let mut scheduler =
          scheduler.borrow_mut();
        scheduler.every(
          Job::DuePoll,
          DUE_POLL_PERIOD,
          true
        );
        scheduler.every(
          Job::CountPoll,
          COUNT_POLL_PERIOD,
          true
        );
      }

      let start_ms = js_sys::Date::now();
      let tick = move || {
        let jobs = scheduler
          .borrow_mut()
          .advance_to(elapsed_since(
            start_ms
          ));
        for job in jobs {
          run_job(
            job,
            poller.clone(),
            ctx.clone(),
            view.clone()
          );
        }
      };
      tick();
      let interval =
        Interval::new(TICK_MS, tick);

      move || drop(interval)
    });
  }

  {
    let word = word.setter();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(
        async move {
          TimeoutFuture::new(millis(
            AUTO_SHOW_DELAY
          ))
          .await;
          let today =
            Local::now().date_naive();
          let Some(message) =
            DailyGate::new(
              LocalStorageStore
            )
            .take(today)
          else {
            tracing::debug!(
              "daily message already \
               shown today"
            );
            return;
          };
          word.set(Some(message));
          TimeoutFuture::new(millis(
            AUTO_CLOSE_AFTER
          ))
          .await;
          word.set(None);
        }
      );
      || ()
    });
  }

  {
    let ctx = ctx.clone();
    let view = view.clone();
    let theme_menu = theme_menu.setter();
    let bell_ref = bell_ref.clone();
    let dropdown_ref =
      dropdown_ref.clone();
    let theme_btn_ref =
      theme_btn_ref.clone();
    let theme_menu_ref =
      theme_menu_ref.clone();
    let poller = poller.clone();
    use_effect_with((), move |_| {
      let document = web_sys::window()
        .and_then(|window| {
          window.document()
        });
      let listeners =
        document.map(|document| {
          let outside_click =
            EventListener::new(
              &document,
              "click",
              move |event| {
                let target = event
                  .target()
                  .and_then(|target| {
                    target
                      .dyn_into::<web_sys::Node>()
                      .ok()
                  });
                if !contains_target(
                  &bell_ref,
                  target.as_ref()
                ) && !contains_target(
                  &dropdown_ref,
                  target.as_ref()
                ) {
                  close_dropdown(
                    &mut ctx.borrow_mut(),
                    &mut view.clone()
                  );
                }
                if !contains_target(
                  &theme_btn_ref,
                  target.as_ref()
                ) && !contains_target(
                  &theme_menu_ref,
                  target.as_ref()
                ) {
                  theme_menu.set(None);
                }
              }
            );
          let task_toggle =
            EventListener::new(
              &document,
              "change",
              move |event| {
                handle_task_checkbox(
                  event,
                  poller.clone()
                );
              }
            );
          (outside_click, task_toggle)
        });

      move || drop(listeners)
    });
  }

  let on_bell = {
    let ctx = ctx.clone();
    let poller = poller.clone();
    let view = view.clone();
    Callback::from(
      move |event: MouseEvent| {
        event.stop_propagation();
        let mut view = view.clone();
        let toggle = start_dropdown_toggle(
          &mut ctx.borrow_mut(),
          &mut view
        );
        if toggle == DropdownToggle::Closed
        {
          return;
        }
        let ctx = ctx.clone();
        let poller = poller.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            let result = poller
              .backend()
              .fetch_count(true)
              .await;
            apply_dropdown_result(
              &mut ctx.borrow_mut(),
              &mut view,
              result
            );
          }
        );
      }
    )
  };

  let on_theme_button = {
    let theme_menu = theme_menu.clone();
    let theme_btn_ref =
      theme_btn_ref.clone();
    Callback::from(
      move |event: MouseEvent| {
        event.stop_propagation();
        if theme_menu.is_some() {
          theme_menu.set(None);
        } else {
          theme_menu.set(Some(
            placement_style(&theme_btn_ref)
          ));
        }
      }
    )
  };

  let on_pick_theme = {
    let ctx = ctx.clone();
    let active_theme =
      active_theme.setter();
    let theme_menu = theme_menu.setter();
    Callback::from(
      move |id: &'static str| {
        let applied = ThemeEngine::new(
          DocumentStyle,
          LocalStorageStore
        )
        .apply_theme(
          &mut ctx.borrow_mut(),
          id
        );
        if let Some(theme) = applied {
          active_theme.set(Some(theme.id));
        }
        theme_menu.set(None);
      }
    )
  };

  let on_dismiss_reminder = {
    let reminders =
      reminders.dispatcher();
    Callback::from(move |key: u64| {
      reminders.dispatch(
        ReminderAction::Dismiss(key)
      );
    })
  };

  let on_word = {
    let word = word.setter();
    Callback::from(move |_: MouseEvent| {
      word.set(Some(message_for_date(
        Local::now().date_naive()
      )));
    })
  };
  let on_close_word = {
    let word = word.setter();
    Callback::from(move |()| word.set(None))
  };

  let on_chat = {
    let chat_open = chat_open.setter();
    Callback::from(move |_: MouseEvent| {
      chat_open.set(true)
    })
  };
  let on_close_chat = {
    let chat_open = chat_open.setter();
    Callback::from(move |()| {
      chat_open.set(false)
    })
  };

  let on_stats = {
    let stats = stats.setter();
    let poller = poller.clone();
    Callback::from(move |_: MouseEvent| {
      stats.set(Some(StatsState::Loading));
      let stats = stats.clone();
      let poller = poller.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let next = match poller
            .fetch_statistics()
            .await
          {
            | Ok(loaded) => {
              StatsState::Ready(loaded)
            }
            | Err(err) => {
              StatsState::Failed(
                err.to_string()
              )
            }
          };
          stats.set(Some(next));
        }
      );
    })
  };
  let on_close_stats = {
    let stats = stats.setter();
    Callback::from(move |()| stats.set(None))
  };

  html! {
      <div class="nudge-widgets">
          <div class="nudge-toolbar">
              <NotificationBell count={*badge} node_ref={bell_ref} onclick={on_bell} />
              <button class="btn theme-btn" id="theme-btn" ref={theme_btn_ref} onclick={on_theme_button} title="Themes">{ "🎨" }</button>
              <button class="btn" onclick={on_word} title="Word of the day">{ "🌟" }</button>
              <button class="btn" onclick={on_chat} title="Assistant">{ "💬" }</button>
              <button class="btn" onclick={on_stats} title="Statistics">{ "📊" }</button>
          </div>

          {
              if let Some((markup, style)) = (*dropdown).clone() {
                  html! { <NotificationDropdown {markup} {style} node_ref={dropdown_ref} /> }
              } else {
                  html! {}
              }
          }

          {
              if let Some(style) = (*theme_menu).clone() {
                  html! { <ThemeMenu active={*active_theme} {style} node_ref={theme_menu_ref} on_pick={on_pick_theme} /> }
              } else {
                  html! {}
              }
          }

          {
              for reminders.open.iter().map(|(key, reminder)| {
                  let key = *key;
                  let on_dismiss = on_dismiss_reminder.clone();
                  html! {
                      <ReminderModal
                          key={key}
                          reminder={reminder.clone()}
                          on_dismiss={Callback::from(move |()| on_dismiss.emit(key))}
                      />
                  }
              })
          }

          {
              if let Some(message) = *word {
                  html! { <WordModal {message} on_close={on_close_word} /> }
              } else {
                  html! {}
              }
          }

          {
              if *chat_open {
                  html! { <ChatModal on_close={on_close_chat} /> }
              } else {
                  html! {}
              }
          }

          {
              if let Some(state) = (*stats).clone() {
                  html! { <StatsModal {state} on_close={on_close_stats} /> }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
