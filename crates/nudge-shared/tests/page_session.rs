use std::cell::Cell;
use std::time::Duration;

use nudge_shared::context::DropdownState;
use nudge_shared::daily::{DailyGate, message_for_date};
use nudge_shared::error::BackendError;
use nudge_shared::notify::{
    Backend, COUNT_POLL_PERIOD, DUE_POLL_PERIOD, NotificationPoller, NotificationView, Reminder,
};
use nudge_shared::prefs::{MemoryStore, PreferenceStore, SELECTED_THEME_KEY};
use nudge_shared::task::{NotificationSnapshot, Priority, Statistics, Task, ToggleResponse};
use nudge_shared::theme::{StyleSheet, ThemeEngine};
use nudge_shared::{AppContext, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Due,
    Count,
}

/// Serves one due task until it is "completed", with the count tracking
/// how many tasks remain.
struct TaskServer {
    done: Cell<bool>,
    offline: Cell<bool>,
}

impl TaskServer {
    fn new() -> Self {
        Self {
            done: Cell::new(false),
            offline: Cell::new(false),
        }
    }

    fn tasks(&self) -> Vec<Task> {
        if self.done.get() {
            return Vec::new();
        }
        let mut task = Task::new(7, "Pay bills", Priority::High);
        task.due_time = Some("09:00".to_string());
        vec![task]
    }

    fn check(&self, endpoint: &str) -> Result<(), BackendError> {
        if self.offline.get() {
            return Err(BackendError::transport(endpoint, "offline"));
        }
        Ok(())
    }
}

impl Backend for TaskServer {
    async fn fetch_due_tasks(&self) -> Result<Vec<Task>, BackendError> {
        self.check("/api/notifications/")?;
        Ok(self.tasks())
    }

    async fn fetch_count(&self, _fresh: bool) -> Result<NotificationSnapshot, BackendError> {
        self.check("/api/notifications/count/")?;
        let tasks = self.tasks();
        Ok(NotificationSnapshot {
            count: tasks.len() as u64,
            tasks,
        })
    }

    async fn fetch_statistics(&self) -> Result<Statistics, BackendError> {
        self.check("/api/statistics/")?;
        Ok(Statistics {
            total_completed: u64::from(self.done.get()),
            tasks_completed_this_week: u64::from(self.done.get()),
            tasks_completed_today: u64::from(self.done.get()),
        })
    }

    async fn toggle_task(&self, id: u64, completed: bool) -> Result<ToggleResponse, BackendError> {
        self.check("/api/toggle-task/")?;
        self.done.set(completed);
        Ok(ToggleResponse {
            success: true,
            task_id: Some(id),
            completed: Some(completed),
            error: None,
        })
    }
}

#[derive(Default)]
struct Page {
    popups: Vec<Reminder>,
    badge: Option<u64>,
    panel: Option<String>,
}

impl NotificationView for Page {
    fn show_reminder(&mut self, reminder: &Reminder) {
        self.popups.push(reminder.clone());
    }

    fn set_badge(&mut self, count: u64) {
        self.badge = Some(count);
    }

    fn render_dropdown(&mut self, _snapshot: &NotificationSnapshot, markup: &str) {
        self.panel = Some(markup.to_string());
    }

    fn close_dropdown(&mut self) {
        self.panel = None;
    }

    fn current_filter(&self) -> String {
        "week".to_string()
    }
}

async fn run_due_jobs(
    scheduler: &mut Scheduler<Job>,
    elapsed: Duration,
    poller: &NotificationPoller<TaskServer>,
    ctx: &mut AppContext,
    page: &mut Page,
) {
    for job in scheduler.advance_to(elapsed) {
        match job {
            Job::Due => {
                let _ = poller.poll_due_tasks(ctx, page).await;
            }
            Job::Count => {
                let _ = poller.poll_count(ctx, page).await;
            }
        }
    }
}

#[tokio::test]
async fn page_session_from_load_to_completion() {
    let mut prefs = MemoryStore::new().with_value(SELECTED_THEME_KEY, "dracula");
    let mut ctx = AppContext::new();
    let mut page = Page::default();

    let theme = ThemeEngine::new(StyleSheet::new(), &mut prefs).load_saved_theme(&mut ctx);
    assert_eq!(theme.id, "dracula");
    assert_eq!(ctx.active_theme(), Some("dracula"));

    let poller = NotificationPoller::new(TaskServer::new());
    let mut scheduler = Scheduler::new();
    scheduler.every(Job::Due, DUE_POLL_PERIOD, true);
    scheduler.every(Job::Count, COUNT_POLL_PERIOD, true);

    // First minute, one tick per second like a page interval.
    for second in 0..60 {
        run_due_jobs(
            &mut scheduler,
            Duration::from_secs(second),
            &poller,
            &mut ctx,
            &mut page,
        )
        .await;
    }
    assert_eq!(page.popups.len(), 1);
    assert_eq!(page.popups[0].task_id, 7);
    assert_eq!(page.badge, Some(1));

    // Open the dropdown; the edit link keeps the page filter.
    assert!(poller.toggle_dropdown(&mut ctx, &mut page).await);
    let panel = page.panel.clone().expect("panel rendered");
    assert!(panel.contains("href=\"&#x2F;edit&#x2F;7&#x2F;?filter&#x3D;week\""));
    assert!(panel.contains(" at 09:00"));

    // The server goes away; polls fail but the open panel and badge stay.
    poller.backend().offline.set(true);
    run_due_jobs(
        &mut scheduler,
        Duration::from_secs(60),
        &poller,
        &mut ctx,
        &mut page,
    )
    .await;
    assert_eq!(page.badge, Some(1));
    assert!(page.panel.is_some());
    assert_eq!(page.popups.len(), 1);

    // Back online: the task is completed and the open panel empties.
    poller.backend().offline.set(false);
    let response = poller.toggle_task(7, true).await.expect("toggle");
    assert_eq!(response.completed, Some(true));
    run_due_jobs(
        &mut scheduler,
        Duration::from_secs(65),
        &poller,
        &mut ctx,
        &mut page,
    )
    .await;
    assert_eq!(page.badge, Some(0));
    assert_eq!(ctx.dropdown(), DropdownState::Open);
    assert!(
        page.panel
            .as_deref()
            .is_some_and(|markup| markup.contains("No tasks to display."))
    );

    assert!(!poller.toggle_dropdown(&mut ctx, &mut page).await);
    assert_eq!(page.panel, None);

    let stats = poller.fetch_statistics().await.expect("stats");
    assert_eq!(stats.tasks_completed_today, 1);
}

#[test]
fn daily_message_gate_shares_the_preference_store() {
    let mut prefs = MemoryStore::new();
    let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 17).expect("date");

    assert_eq!(
        DailyGate::new(&mut prefs).take(today),
        Some(message_for_date(today))
    );
    assert_eq!(DailyGate::new(&mut prefs).take(today), None);
    assert!(prefs.get(SELECTED_THEME_KEY).is_none());
    assert_eq!(prefs.values().len(), 1);
}
