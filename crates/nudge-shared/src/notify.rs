//! Due-task reminders, the badge count
//! and the dropdown lifecycle.
//!
//! Network calls live behind
//! [`Backend`]; everything the user
//! sees goes through
//! [`NotificationView`]. The `apply_*`
//! functions hold the reconciliation
//! rules and are synchronous, so a
//! frontend that cannot keep a borrow
//! across an `.await` can fetch first
//! and reconcile afterwards.

use std::time::Duration;

use tracing::{
  debug,
  error,
  info,
  warn
};

use crate::context::{
  AppContext,
  DropdownState
};
use crate::dropdown::{
  DEFAULT_FILTER,
  render_dropdown
};
use crate::error::BackendError;
use crate::task::{
  NotificationSnapshot,
  Priority,
  Statistics,
  Task,
  ToggleResponse
};

pub const DUE_POLL_PERIOD: Duration =
  Duration::from_secs(60);
pub const COUNT_POLL_PERIOD: Duration =
  Duration::from_secs(5);
/// How long a reminder modal stays up
/// without user action.
pub const REMINDER_DISMISS_AFTER:
  Duration = Duration::from_secs(8);

pub const REMINDER_TITLE: &str =
  "Task Reminder";
pub const REMINDER_ICON: &str =
  "/static/icon.png";
pub const NO_DESCRIPTION: &str =
  "No description";

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
  pub task_id:     u64,
  pub title:       String,
  pub description: String,
  pub priority:    Priority,
  pub due_time:    Option<String>
}

impl Reminder {
  pub fn from_task(task: &Task) -> Self {
    Self {
      task_id:     task.id,
      title:       task.title.clone(),
      description: task
        .description_text()
        .unwrap_or(NO_DESCRIPTION)
        .to_string(),
      priority:    task.priority,
      due_time:    task.due_time.clone()
    }
  }

  /// Body of the desktop notification.
  pub fn message(&self) -> String {
    format!(
      "⏰ Reminder: \"{}\" is due today! \
       (Priority: {})",
      self.title, self.priority
    )
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum NotificationPermission {
  /// Not decided yet.
  #[default]
  Default,
  Granted,
  Denied,
  Unsupported
}

impl NotificationPermission {
  pub fn allows_desktop(self) -> bool {
    self == Self::Granted
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Default => "default",
      | Self::Granted => "granted",
      | Self::Denied => "denied",
      | Self::Unsupported => "unsupported"
    }
  }
}

/// Permission is asked for only while
/// undecided; a denial is final.
pub fn should_request_permission(
  permission: NotificationPermission
) -> bool {
  permission
    == NotificationPermission::Default
}

/// The task backend.
#[allow(async_fn_in_trait)]
pub trait Backend {
  /// Tasks due now, from
  /// `/api/notifications/`.
  async fn fetch_due_tasks(
    &self
  ) -> Result<Vec<Task>, BackendError>;

  /// `{count, tasks}`; `fresh` adds a
  /// cache-busting parameter.
  async fn fetch_count(
    &self,
    fresh: bool
  ) -> Result<
    NotificationSnapshot,
    BackendError
  >;

  async fn fetch_statistics(
    &self
  ) -> Result<Statistics, BackendError>;

  async fn toggle_task(
    &self,
    id: u64,
    completed: bool
  ) -> Result<ToggleResponse, BackendError>;
}

/// Where reminders, the badge and the
/// dropdown panel are shown.
pub trait NotificationView {
  fn show_reminder(
    &mut self,
    reminder: &Reminder
  );

  fn set_badge(&mut self, count: u64);

  /// Shows (or replaces) the dropdown
  /// panel. `markup` is the escaped
  /// rendering of `snapshot.tasks`.
  fn render_dropdown(
    &mut self,
    snapshot: &NotificationSnapshot,
    markup: &str
  );

  fn close_dropdown(&mut self);

  /// List filter preserved in edit
  /// links.
  fn current_filter(&self) -> String {
    DEFAULT_FILTER.to_string()
  }

  fn desktop_permission(
    &self
  ) -> NotificationPermission {
    NotificationPermission::Unsupported
  }

  fn request_desktop_permission(
    &mut self
  ) {
  }

  fn mirror_to_desktop(
    &mut self,
    _reminder: &Reminder
  ) -> Result<(), String> {
    Ok(())
  }
}

impl<T> NotificationView for &mut T
where
  T: NotificationView + ?Sized
{
  fn show_reminder(
    &mut self,
    reminder: &Reminder
  ) {
    (**self).show_reminder(reminder)
  }

  fn set_badge(&mut self, count: u64) {
    (**self).set_badge(count)
  }

  fn render_dropdown(
    &mut self,
    snapshot: &NotificationSnapshot,
    markup: &str
  ) {
    (**self).render_dropdown(snapshot, markup)
  }

  fn close_dropdown(&mut self) {
    (**self).close_dropdown()
  }

  fn current_filter(&self) -> String {
    (**self).current_filter()
  }

  fn desktop_permission(
    &self
  ) -> NotificationPermission {
    (**self).desktop_permission()
  }

  fn request_desktop_permission(
    &mut self
  ) {
    (**self).request_desktop_permission()
  }

  fn mirror_to_desktop(
    &mut self,
    reminder: &Reminder
  ) -> Result<(), String> {
    (**self).mirror_to_desktop(reminder)
  }
}

/// Asks for desktop permission once, at
/// startup, when still undecided.
pub fn init_desktop<V>(
  view: &mut V
) -> NotificationPermission
where
  V: NotificationView
{
  let permission =
    view.desktop_permission();
  if should_request_permission(permission)
  {
    info!("requesting desktop notification permission");
    view.request_desktop_permission();
  }
  view.desktop_permission()
}

/// Shows a reminder unless this task
/// already had one this session.
/// Returns whether anything was shown.
pub fn deliver_reminder<V>(
  ctx: &mut AppContext,
  view: &mut V,
  task: &Task
) -> bool
where
  V: NotificationView
{
  if !ctx.mark_reminder_shown(task.id) {
    debug!(
      task_id = task.id,
      "reminder already shown"
    );
    return false;
  }

  let reminder = Reminder::from_task(task);
  view.show_reminder(&reminder);

  if view
    .desktop_permission()
    .allows_desktop()
    && let Err(error) =
      view.mirror_to_desktop(&reminder)
  {
    warn!(
      task_id = task.id,
      %error,
      "desktop notification failed"
    );
  }
  true
}

/// Reconciles a due-task poll. Returns
/// the number of new reminders.
pub fn apply_due_result<V>(
  ctx: &mut AppContext,
  view: &mut V,
  result: Result<Vec<Task>, BackendError>
) -> Result<usize, BackendError>
where
  V: NotificationView
{
  let tasks = result.inspect_err(|err| {
    error!(
      error = %err,
      "error checking notifications"
    );
  })?;

  let shown = tasks
    .iter()
    .filter(|task| {
      deliver_reminder(ctx, view, task)
    })
    .count();
  if shown > 0 {
    info!(shown, "reminders delivered");
  }
  Ok(shown)
}

/// Reconciles a count poll: snapshot,
/// badge, and an open dropdown.
pub fn apply_count_result<V>(
  ctx: &mut AppContext,
  view: &mut V,
  result: Result<
    NotificationSnapshot,
    BackendError
  >
) -> Result<u64, BackendError>
where
  V: NotificationView
{
  let snapshot =
    result.inspect_err(|err| {
      error!(
        error = %err,
        "error fetching notification count"
      );
    })?;

  let count = snapshot.count;
  ctx.replace_snapshot(snapshot);
  view.set_badge(count);
  if ctx.dropdown() == DropdownState::Open
  {
    render_snapshot(ctx, view);
  }
  Ok(count)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum DropdownToggle {
  /// The panel was up (or loading) and
  /// is now gone.
  Closed,
  /// A fresh fetch should follow.
  Opening
}

pub fn start_dropdown_toggle<V>(
  ctx: &mut AppContext,
  view: &mut V
) -> DropdownToggle
where
  V: NotificationView
{
  if ctx.dropdown() != DropdownState::Closed
  {
    close_dropdown(ctx, view);
    return DropdownToggle::Closed;
  }
  ctx.set_dropdown(DropdownState::Loading);
  DropdownToggle::Opening
}

/// Finishes opening the dropdown. A
/// failed fetch falls back to the last
/// snapshot. If the panel was closed
/// while loading, a successful result
/// still refreshes the snapshot but
/// nothing is rendered.
pub fn apply_dropdown_result<V>(
  ctx: &mut AppContext,
  view: &mut V,
  result: Result<
    NotificationSnapshot,
    BackendError
  >
) -> bool
where
  V: NotificationView
{
  match result {
    | Ok(snapshot) => {
      let count = snapshot.count;
      ctx.replace_snapshot(snapshot);
      view.set_badge(count);
    }
    | Err(err) => {
      error!(
        error = %err,
        "error fetching notifications; \
         using cached snapshot"
      );
    }
  }

  if ctx.dropdown() != DropdownState::Loading
  {
    debug!("dropdown closed before data arrived");
    return false;
  }
  ctx.set_dropdown(DropdownState::Open);
  render_snapshot(ctx, view);
  true
}

/// Closes the panel, e.g. on a click
/// outside it.
pub fn close_dropdown<V>(
  ctx: &mut AppContext,
  view: &mut V
) where
  V: NotificationView
{
  if ctx.dropdown() == DropdownState::Closed
  {
    return;
  }
  ctx.set_dropdown(DropdownState::Closed);
  view.close_dropdown();
}

fn render_snapshot<V>(
  ctx: &AppContext,
  view: &mut V
) where
  V: NotificationView
{
  let filter = view.current_filter();
  let snapshot = ctx.snapshot();
  let markup =
    render_dropdown(&snapshot.tasks, &filter);
  view.render_dropdown(snapshot, &markup);
}

/// Maps `success: false` to an error.
pub fn check_toggle(
  response: ToggleResponse
) -> Result<ToggleResponse, BackendError> {
  if response.success {
    Ok(response)
  } else {
    Err(BackendError::Rejected {
      message: response
        .error
        .unwrap_or_else(|| {
          "unknown error".to_string()
        })
    })
  }
}

/// Drives the backend for one
/// [`AppContext`].
#[derive(Debug, Clone)]
pub struct NotificationPoller<B> {
  backend: B
}

impl<B> NotificationPoller<B>
where
  B: Backend
{
  pub fn new(backend: B) -> Self {
    Self { backend }
  }

  pub fn backend(&self) -> &B {
    &self.backend
  }

  #[tracing::instrument(skip_all)]
  pub async fn poll_due_tasks<V>(
    &self,
    ctx: &mut AppContext,
    view: &mut V
  ) -> Result<usize, BackendError>
  where
    V: NotificationView
  {
    let result =
      self.backend.fetch_due_tasks().await;
    apply_due_result(ctx, view, result)
  }

  #[tracing::instrument(skip_all)]
  pub async fn poll_count<V>(
    &self,
    ctx: &mut AppContext,
    view: &mut V
  ) -> Result<u64, BackendError>
  where
    V: NotificationView
  {
    let result =
      self.backend.fetch_count(false).await;
    apply_count_result(ctx, view, result)
  }

  /// Returns whether the panel ended up
  /// open.
  #[tracing::instrument(skip_all)]
  pub async fn toggle_dropdown<V>(
    &self,
    ctx: &mut AppContext,
    view: &mut V
  ) -> bool
  where
    V: NotificationView
  {
    match start_dropdown_toggle(ctx, view) {
      | DropdownToggle::Closed => false,
      | DropdownToggle::Opening => {
        let result =
          self.backend.fetch_count(true).await;
        apply_dropdown_result(
          ctx, view, result
        )
      }
    }
  }

  #[tracing::instrument(skip(self))]
  pub async fn fetch_statistics(
    &self
  ) -> Result<Statistics, BackendError> {
    self
      .backend
      .fetch_statistics()
      .await
      .inspect_err(|err| {
        error!(
          error = %err,
          "error fetching statistics"
        );
      })
  }

  /// Toggles completion. The response
  /// tells the caller which way to move
  /// its counters.
  #[tracing::instrument(skip(self))]
  pub async fn toggle_task(
    &self,
    id: u64,
    completed: bool
  ) -> Result<ToggleResponse, BackendError>
  {
    self
      .backend
      .toggle_task(id, completed)
      .await
      .and_then(check_toggle)
      .inspect_err(|err| {
        error!(
          task_id = id,
          error = %err,
          "error toggling task"
        );
      })
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::collections::VecDeque;

  use super::{
    Backend,
    DropdownToggle,
    NO_DESCRIPTION,
    NotificationPermission,
    NotificationPoller,
    NotificationView,
    Reminder,
    apply_count_result,
    apply_dropdown_result,
    close_dropdown,
    init_desktop,
    should_request_permission,
    start_dropdown_toggle
  };
  use crate::context::{
    AppContext,
    DropdownState
  };
  use crate::error::BackendError;
  use crate::task::{
    NotificationSnapshot,
    Priority,
    Statistics,
    Task,
    TaskCounters,
    ToggleResponse
  };

  type Queue<T> =
    RefCell<VecDeque<Result<T, BackendError>>>;

  #[derive(Default)]
  struct FakeBackend {
    due:    Queue<Vec<Task>>,
    counts: Queue<NotificationSnapshot>,
    fresh:  RefCell<Vec<bool>>,
    toggle: Queue<ToggleResponse>
  }

  fn offline() -> BackendError {
    BackendError::transport(
      "/api/notifications/",
      "connection refused"
    )
  }

  impl FakeBackend {
    fn push_due(
      &self,
      result: Result<Vec<Task>, BackendError>
    ) {
      self.due.borrow_mut().push_back(result);
    }

    fn push_count(
      &self,
      result: Result<
        NotificationSnapshot,
        BackendError
      >
    ) {
      self
        .counts
        .borrow_mut()
        .push_back(result);
    }
  }

  impl Backend for FakeBackend {
    async fn fetch_due_tasks(
      &self
    ) -> Result<Vec<Task>, BackendError> {
      self
        .due
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(offline()))
    }

    async fn fetch_count(
      &self,
      fresh: bool
    ) -> Result<
      NotificationSnapshot,
      BackendError
    > {
      self.fresh.borrow_mut().push(fresh);
      self
        .counts
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(offline()))
    }

    async fn fetch_statistics(
      &self
    ) -> Result<Statistics, BackendError> {
      Ok(Statistics::default())
    }

    async fn toggle_task(
      &self,
      _id: u64,
      _completed: bool
    ) -> Result<ToggleResponse, BackendError>
    {
      self
        .toggle
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(offline()))
    }
  }

  #[derive(Default)]
  struct RecordingView {
    reminders:     Vec<Reminder>,
    badge:         Option<u64>,
    panel:         Option<String>,
    renders:       usize,
    permission:    NotificationPermission,
    requests:      usize,
    desktop:       Vec<u64>,
    desktop_fails: bool
  }

  impl NotificationView for RecordingView {
    fn show_reminder(
      &mut self,
      reminder: &Reminder
    ) {
      self.reminders.push(reminder.clone());
    }

    fn set_badge(&mut self, count: u64) {
      self.badge = Some(count);
    }

    fn render_dropdown(
      &mut self,
      _snapshot: &NotificationSnapshot,
      markup: &str
    ) {
      self.panel = Some(markup.to_string());
      self.renders += 1;
    }

    fn close_dropdown(&mut self) {
      self.panel = None;
    }

    fn desktop_permission(
      &self
    ) -> NotificationPermission {
      self.permission
    }

    fn request_desktop_permission(
      &mut self
    ) {
      self.requests += 1;
      self.permission =
        NotificationPermission::Granted;
    }

    fn mirror_to_desktop(
      &mut self,
      reminder: &Reminder
    ) -> Result<(), String> {
      if self.desktop_fails {
        return Err("blocked".into());
      }
      self.desktop.push(reminder.task_id);
      Ok(())
    }
  }

  fn pay_bills() -> Task {
    Task::new(7, "Pay bills", Priority::High)
  }

  fn snapshot(
    count: u64,
    titles: &[&str]
  ) -> NotificationSnapshot {
    NotificationSnapshot {
      count,
      tasks: titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
          Task::new(
            i as u64 + 1,
            *title,
            Priority::Medium
          )
        })
        .collect()
    }
  }

  #[tokio::test]
  async fn new_due_task_shows_exactly_one_popup()
  {
    let backend = FakeBackend::default();
    backend.push_due(Ok(vec![pay_bills()]));
    backend.push_due(Ok(vec![pay_bills()]));
    let poller = NotificationPoller::new(backend);
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    let first = poller
      .poll_due_tasks(&mut ctx, &mut view)
      .await
      .expect("first poll");
    let second = poller
      .poll_due_tasks(&mut ctx, &mut view)
      .await
      .expect("second poll");

    assert_eq!((first, second), (1, 0));
    assert_eq!(view.reminders.len(), 1);
    let reminder = &view.reminders[0];
    assert_eq!(reminder.title, "Pay bills");
    assert_eq!(reminder.description, NO_DESCRIPTION);
    assert_eq!(
      reminder.message(),
      "⏰ Reminder: \"Pay bills\" is due today! \
       (Priority: High)"
    );
    assert!(ctx.reminder_shown(7));
  }

  #[tokio::test]
  async fn failed_due_poll_keeps_state() {
    let backend = FakeBackend::default();
    backend.push_due(Ok(vec![pay_bills()]));
    backend.push_due(Err(offline()));
    let poller = NotificationPoller::new(backend);
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    poller
      .poll_due_tasks(&mut ctx, &mut view)
      .await
      .expect("first poll");
    let err = poller
      .poll_due_tasks(&mut ctx, &mut view)
      .await
      .expect_err("offline");
    assert!(matches!(
      err,
      BackendError::Transport { .. }
    ));
    assert_eq!(ctx.shown_reminder_count(), 1);
    assert_eq!(view.reminders.len(), 1);
  }

  #[tokio::test]
  async fn badge_follows_count_and_failures_keep_it()
  {
    let backend = FakeBackend::default();
    backend.push_count(Ok(snapshot(
      3,
      &["a", "b", "c"]
    )));
    backend.push_count(Err(offline()));
    let poller = NotificationPoller::new(backend);
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    let count = poller
      .poll_count(&mut ctx, &mut view)
      .await
      .expect("count");
    assert_eq!(count, 3);
    assert_eq!(view.badge, Some(3));

    poller
      .poll_count(&mut ctx, &mut view)
      .await
      .expect_err("offline");
    assert_eq!(view.badge, Some(3));
    assert_eq!(ctx.snapshot().count, 3);
    assert_eq!(
      *poller.backend().fresh.borrow(),
      vec![false, false]
    );
  }

  #[test]
  fn omitted_count_shows_zero() {
    let response: crate::task::CountResponse =
      serde_json::from_str(r#"{"tasks": []}"#)
        .expect("decode");
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();
    let count = apply_count_result(
      &mut ctx,
      &mut view,
      Ok(response.into())
    )
    .expect("count");
    assert_eq!(count, 0);
    assert_eq!(view.badge, Some(0));
  }

  #[tokio::test]
  async fn dropdown_opens_with_fresh_data_and_closes()
  {
    let backend = FakeBackend::default();
    backend
      .push_count(Ok(snapshot(1, &["Gym"])));
    let poller = NotificationPoller::new(backend);
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    assert!(
      poller
        .toggle_dropdown(&mut ctx, &mut view)
        .await
    );
    assert_eq!(ctx.dropdown(), DropdownState::Open);
    let panel =
      view.panel.clone().expect("panel");
    assert!(panel.contains("Gym"));
    assert_eq!(
      *poller.backend().fresh.borrow(),
      vec![true]
    );

    assert!(
      !poller
        .toggle_dropdown(&mut ctx, &mut view)
        .await
    );
    assert_eq!(
      ctx.dropdown(),
      DropdownState::Closed
    );
    assert!(view.panel.is_none());
  }

  #[tokio::test]
  async fn dropdown_falls_back_to_cached_snapshot()
  {
    let backend = FakeBackend::default();
    backend.push_count(Ok(snapshot(
      2,
      &["Cached one", "Cached two"]
    )));
    let poller = NotificationPoller::new(backend);
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    poller
      .poll_count(&mut ctx, &mut view)
      .await
      .expect("count");
    // The queue is empty now, so the
    // fresh fetch fails.
    assert!(
      poller
        .toggle_dropdown(&mut ctx, &mut view)
        .await
    );
    let panel =
      view.panel.clone().expect("panel");
    assert!(panel.contains("Cached one"));
    assert!(panel.contains("Cached two"));
  }

  #[test]
  fn open_dropdown_is_rerendered_by_count_poll()
  {
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    assert_eq!(
      start_dropdown_toggle(&mut ctx, &mut view),
      DropdownToggle::Opening
    );
    apply_dropdown_result(
      &mut ctx,
      &mut view,
      Ok(snapshot(1, &["Old"]))
    );
    apply_count_result(
      &mut ctx,
      &mut view,
      Ok(snapshot(1, &["New"]))
    )
    .expect("count");

    assert_eq!(view.renders, 2);
    let panel =
      view.panel.clone().expect("panel");
    assert!(panel.contains("New"));

    close_dropdown(&mut ctx, &mut view);
    apply_count_result(
      &mut ctx,
      &mut view,
      Ok(snapshot(0, &[]))
    )
    .expect("count");
    assert_eq!(view.renders, 2);
    assert!(view.panel.is_none());
  }

  #[test]
  fn late_dropdown_result_after_close_is_not_rendered()
  {
    let mut ctx = AppContext::new();
    let mut view = RecordingView::default();

    start_dropdown_toggle(&mut ctx, &mut view);
    assert_eq!(
      start_dropdown_toggle(&mut ctx, &mut view),
      DropdownToggle::Closed
    );
    let opened = apply_dropdown_result(
      &mut ctx,
      &mut view,
      Ok(snapshot(4, &["Late"]))
    );

    assert!(!opened);
    assert_eq!(view.renders, 0);
    assert_eq!(ctx.snapshot().count, 4);
    assert_eq!(
      ctx.dropdown(),
      DropdownState::Closed
    );
  }

  #[test]
  fn permission_is_requested_only_when_undecided()
  {
    assert!(should_request_permission(
      NotificationPermission::Default
    ));
    assert!(!should_request_permission(
      NotificationPermission::Denied
    ));

    let mut view = RecordingView::default();
    assert_eq!(
      init_desktop(&mut view),
      NotificationPermission::Granted
    );
    init_desktop(&mut view);
    assert_eq!(view.requests, 1);

    let mut denied = RecordingView {
      permission: NotificationPermission::Denied,
      ..RecordingView::default()
    };
    init_desktop(&mut denied);
    assert_eq!(denied.requests, 0);
  }

  #[tokio::test]
  async fn desktop_failure_does_not_block_popup()
  {
    let backend = FakeBackend::default();
    backend.push_due(Ok(vec![pay_bills()]));
    let poller = NotificationPoller::new(backend);
    let mut ctx = AppContext::new();
    let mut view = RecordingView {
      permission:    NotificationPermission::Granted,
      desktop_fails: true,
      ..RecordingView::default()
    };

    poller
      .poll_due_tasks(&mut ctx, &mut view)
      .await
      .expect("poll");
    assert_eq!(view.reminders.len(), 1);
    assert!(view.desktop.is_empty());
  }

  #[tokio::test]
  async fn rejected_toggle_is_an_error()
  {
    let backend = FakeBackend::default();
    backend.toggle.borrow_mut().push_back(Ok(
      ToggleResponse {
        success: true,
        task_id: Some(5),
        completed: Some(true),
        error: None
      }
    ));
    backend.toggle.borrow_mut().push_back(Ok(
      ToggleResponse {
        success: false,
        error: Some("Task not found".into()),
        ..ToggleResponse::default()
      }
    ));
    let poller = NotificationPoller::new(backend);
    let mut counters = TaskCounters {
      pending:   2,
      completed: 0
    };

    let response = poller
      .toggle_task(5, true)
      .await
      .expect("toggle");
    counters.apply_toggle(
      response.completed.unwrap_or(true)
    );
    assert_eq!(
      counters,
      TaskCounters {
        pending:   1,
        completed: 1
      }
    );

    let err = poller
      .toggle_task(9, true)
      .await
      .expect_err("rejected");
    assert_eq!(
      err,
      BackendError::Rejected {
        message: "Task not found".into()
      }
    );
    assert_eq!(counters.completed, 1);
  }
}
