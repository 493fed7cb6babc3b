use std::future::Future;
use std::time::Duration;

use nudge_shared::context::AppContext;
use nudge_shared::notify::{Backend, NotificationPoller, NotificationView, init_desktop};
use nudge_shared::schedule::Scheduler;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    DuePoll,
    CountPoll,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    pub due_polls: usize,
    pub count_polls: usize,
}

/// Polls due tasks and the badge count until `shutdown` resolves.
///
/// Both polls run once right away. Failures are logged by the poller and
/// leave the previous state on screen.
#[tracing::instrument(skip_all, fields(due_secs = due_period.as_secs(), count_secs = count_period.as_secs()))]
pub async fn run_watch<B, V, F>(
    poller: &NotificationPoller<B>,
    ctx: &mut AppContext,
    view: &mut V,
    due_period: Duration,
    count_period: Duration,
    shutdown: F,
) -> WatchSummary
where
    B: Backend,
    V: NotificationView,
    F: Future<Output = ()>,
{
    let permission = init_desktop(view);
    info!(permission = permission.label(), "watching for due tasks");

    let mut scheduler = Scheduler::new();
    scheduler.every(Job::DuePoll, due_period, true);
    scheduler.every(Job::CountPoll, count_period, true);

    let mut summary = WatchSummary::default();
    let start = Instant::now();
    tokio::pin!(shutdown);

    loop {
        for job in scheduler.advance_to(start.elapsed()) {
            match job {
                Job::DuePoll => {
                    summary.due_polls += 1;
                    if let Ok(shown) = poller.poll_due_tasks(ctx, view).await {
                        debug!(shown, "due poll finished");
                    }
                }
                Job::CountPoll => {
                    summary.count_polls += 1;
                    if let Ok(count) = poller.poll_count(ctx, view).await {
                        debug!(count, "count poll finished");
                    }
                }
            }
        }

        let Some(deadline) = scheduler.next_deadline() else {
            break;
        };
        let wait = deadline.saturating_sub(start.elapsed());

        tokio::select! {
            () = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
            () = sleep(wait) => {}
        }
    }

    summary
}
