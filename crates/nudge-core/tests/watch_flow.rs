use std::cell::Cell;
use std::time::Duration;

use nudge_core::commands::run_watch;
use nudge_core::render::{Renderer, TerminalView};
use nudge_shared::context::AppContext;
use nudge_shared::error::BackendError;
use nudge_shared::notify::{Backend, NotificationPoller};
use nudge_shared::task::{NotificationSnapshot, Priority, Statistics, Task, ToggleResponse};

#[derive(Default)]
struct StaticBackend {
    due_calls: Cell<usize>,
    count_calls: Cell<usize>,
    offline: bool,
}

impl Backend for StaticBackend {
    async fn fetch_due_tasks(&self) -> Result<Vec<Task>, BackendError> {
        self.due_calls.set(self.due_calls.get() + 1);
        if self.offline {
            return Err(BackendError::transport("/api/notifications/", "offline"));
        }
        Ok(vec![Task::new(7, "Pay bills", Priority::High)])
    }

    async fn fetch_count(&self, _fresh: bool) -> Result<NotificationSnapshot, BackendError> {
        self.count_calls.set(self.count_calls.get() + 1);
        if self.offline {
            return Err(BackendError::transport("/api/notifications/count/", "offline"));
        }
        Ok(NotificationSnapshot {
            count: 3,
            tasks: Vec::new(),
        })
    }

    async fn fetch_statistics(&self) -> Result<Statistics, BackendError> {
        Ok(Statistics::default())
    }

    async fn toggle_task(&self, _id: u64, _completed: bool) -> Result<ToggleResponse, BackendError> {
        Ok(ToggleResponse::default())
    }
}

#[tokio::test(start_paused = true)]
async fn watch_polls_on_both_schedules_and_reminds_once() {
    let poller = NotificationPoller::new(StaticBackend::default());
    let mut ctx = AppContext::new();
    let mut view = TerminalView::new(Renderer::plain(), Vec::new(), "today").with_desktop(true);

    let summary = run_watch(
        &poller,
        &mut ctx,
        &mut view,
        Duration::from_secs(60),
        Duration::from_secs(5),
        tokio::time::sleep(Duration::from_secs(61)),
    )
    .await;

    assert_eq!(summary.due_polls, 2);
    assert_eq!(summary.count_polls, 13);
    assert_eq!(poller.backend().due_calls.get(), 2);
    assert_eq!(poller.backend().count_calls.get(), 13);
    assert_eq!(ctx.shown_reminder_count(), 1);
    assert_eq!(ctx.snapshot().count, 3);

    let out = String::from_utf8(view.into_inner()).expect("utf8");
    assert_eq!(out.matches("Pay bills").count(), 2, "popup and desktop mirror: {out}");
    assert_eq!(out.matches("\x1b]9;Task Reminder:").count(), 1);
    assert_eq!(out.matches("🔔 3 tasks due").count(), 1);
}

#[tokio::test(start_paused = true)]
async fn offline_backend_keeps_polling_without_output() {
    let poller = NotificationPoller::new(StaticBackend {
        offline: true,
        ..StaticBackend::default()
    });
    let mut ctx = AppContext::new();
    let mut view = TerminalView::new(Renderer::plain(), Vec::new(), "today");

    let summary = run_watch(
        &poller,
        &mut ctx,
        &mut view,
        Duration::from_secs(60),
        Duration::from_secs(5),
        tokio::time::sleep(Duration::from_secs(11)),
    )
    .await;

    assert_eq!(summary.due_polls, 1);
    assert_eq!(summary.count_polls, 3);
    assert_eq!(ctx.shown_reminder_count(), 0);
    assert!(view.into_inner().is_empty());
}
