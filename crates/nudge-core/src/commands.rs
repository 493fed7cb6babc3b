mod watch;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, anyhow};
use chrono::Local;
use nudge_shared::chat::respond;
use nudge_shared::context::AppContext;
use nudge_shared::daily::{DailyGate, message_for_date};
use nudge_shared::notify::NotificationPoller;
use nudge_shared::prefs::{PreferenceStore, SELECTED_THEME_KEY};
use nudge_shared::theme::{StyleSheet, ThemeEngine, default_theme, find_theme};
use tokio::runtime::Runtime;
use tracing::{debug, info, instrument};

pub use self::watch::{WatchSummary, run_watch};
use crate::cli::Command;
use crate::config::Settings;
use crate::http::HttpBackend;
use crate::render::{Renderer, TerminalView};
use crate::store::{FileStore, write_atomic};

#[instrument(skip(store, settings, renderer))]
pub fn dispatch(
    store: &mut FileStore,
    settings: &Settings,
    renderer: &mut Renderer,
    command: Option<Command>,
) -> anyhow::Result<()> {
    let command = match command {
        Some(command) => command,
        None => {
            let name = settings.default_command.as_str();
            debug!(command = %name, "no explicit command, using default");
            Command::from_default_name(name)
                .ok_or_else(|| anyhow!("invalid default.command setting: {name}"))?
        }
    };

    debug!(command = command.name(), "dispatching command");

    match command {
        Command::Watch => cmd_watch(store, settings, renderer),
        Command::Notifications { html } => cmd_notifications(store, settings, renderer, html),
        Command::Themes => cmd_themes(store, renderer),
        Command::Theme { id, css } => cmd_theme(store, renderer, &id, css),
        Command::Word { auto } => cmd_word(store, renderer, auto),
        Command::Chat { text } => cmd_chat(&text),
        Command::Stats => cmd_stats(settings, renderer),
        Command::Toggle { id, undo } => cmd_toggle(settings, id, !undo),
    }
}

fn runtime() -> anyhow::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn poller(settings: &Settings) -> anyhow::Result<NotificationPoller<HttpBackend>> {
    let backend = HttpBackend::new(settings.server.clone(), settings.request_timeout)?;
    Ok(NotificationPoller::new(backend))
}

#[instrument(skip_all)]
fn cmd_watch(
    store: &mut FileStore,
    settings: &Settings,
    renderer: &mut Renderer,
) -> anyhow::Result<()> {
    info!(server = %settings.server, "command watch");

    let mut ctx = AppContext::new();
    let theme = ThemeEngine::new(StyleSheet::new(), &mut *store).load_saved_theme(&mut ctx);
    debug!(theme = theme.id, "theme loaded for session");

    ctx.replace_snapshot(store.load_snapshot());
    let poller = poller(settings)?;
    let mut view = TerminalView::new(renderer.clone(), io::stdout(), &settings.list_filter)
        .with_desktop(settings.desktop && io::stdout().is_terminal());

    let rt = runtime()?;
    let summary = rt.block_on(run_watch(
        &poller,
        &mut ctx,
        &mut view,
        settings.due_period,
        settings.count_period,
        async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        },
    ));

    store.save_snapshot(ctx.snapshot())?;
    info!(
        due_polls = summary.due_polls,
        count_polls = summary.count_polls,
        reminders = ctx.shown_reminder_count(),
        "watch stopped"
    );
    Ok(())
}

#[instrument(skip(store, settings, renderer))]
fn cmd_notifications(
    store: &mut FileStore,
    settings: &Settings,
    renderer: &mut Renderer,
    html: bool,
) -> anyhow::Result<()> {
    info!("command notifications");

    let mut ctx = AppContext::new();
    ctx.replace_snapshot(store.load_snapshot());
    let poller = poller(settings)?;
    let mut view = TerminalView::new(renderer.clone(), io::stdout(), &settings.list_filter)
        .with_html(html);

    let rt = runtime()?;
    let opened = rt.block_on(poller.toggle_dropdown(&mut ctx, &mut view));
    debug!(opened, "dropdown rendered");

    store.save_snapshot(ctx.snapshot())
}

#[instrument(skip_all)]
fn cmd_themes(store: &mut FileStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    let active = store
        .get(SELECTED_THEME_KEY)
        .as_deref()
        .and_then(find_theme)
        .unwrap_or_else(default_theme);
    renderer.write_themes(io::stdout().lock(), active.id)?;
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_theme(
    store: &mut FileStore,
    renderer: &mut Renderer,
    id: &str,
    css: bool,
) -> anyhow::Result<()> {
    let mut ctx = AppContext::new();
    let mut engine = ThemeEngine::new(StyleSheet::new(), &mut *store);
    let theme = engine
        .apply_theme(&mut ctx, id)
        .ok_or_else(|| anyhow!("unknown theme: {id} (see `nudge themes`)"))?;
    let (sheet, _) = engine.into_parts();

    // apply_theme only logs a failed save.
    if store.get(SELECTED_THEME_KEY).as_deref() != Some(theme.id) {
        return Err(anyhow!("failed to save theme selection"));
    }

    renderer.write_theme_applied(io::stdout().lock(), theme)?;

    if css {
        let path = store.theme_css_path();
        write_atomic(&path, sheet.to_css().as_bytes())
            .with_context(|| format!("failed writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_word(store: &mut FileStore, renderer: &mut Renderer, auto: bool) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let message = if auto {
        DailyGate::new(&mut *store).take(today)
    } else {
        Some(message_for_date(today))
    };

    match message {
        Some(message) => renderer.write_word(io::stdout().lock(), today, message)?,
        None => debug!("daily message already shown today"),
    }
    Ok(())
}

#[instrument(skip_all)]
fn cmd_chat(text: &[String]) -> anyhow::Result<()> {
    if !text.is_empty() {
        println!("{}", respond(&text.join(" ")));
        return Ok(());
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut out = io::stdout().lock();
    if interactive {
        writeln!(out, "{}", respond("hello"))?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed reading chat input")?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}\n", respond(&line))?;
    }
    Ok(())
}

#[instrument(skip_all)]
fn cmd_stats(settings: &Settings, renderer: &mut Renderer) -> anyhow::Result<()> {
    let poller = poller(settings)?;
    let stats = runtime()?
        .block_on(poller.fetch_statistics())
        .context("failed to fetch statistics")?;
    renderer.write_statistics(io::stdout().lock(), &stats)?;
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_toggle(settings: &Settings, id: u64, completed: bool) -> anyhow::Result<()> {
    let poller = poller(settings)?;
    let response = runtime()?
        .block_on(poller.toggle_task(id, completed))
        .with_context(|| format!("failed to toggle task {id}"))?;

    let state = if response.completed.unwrap_or(completed) {
        "completed"
    } else {
        "pending"
    };
    println!("Task {id} marked {state}.");
    Ok(())
}
