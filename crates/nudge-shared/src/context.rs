use std::collections::BTreeSet;

use crate::task::NotificationSnapshot;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum DropdownState {
  #[default]
  Closed,
  /// Opened by the user, waiting for
  /// fresh data.
  Loading,
  Open
}

/// Process-wide client state.
///
/// Owned by the single event loop:
/// the `watch` task natively, an
/// `Rc<RefCell<_>>` in the browser.
/// Reads go through the getters;
/// every write has a named method so
/// the mutation points stay auditable.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
  active_theme:    Option<&'static str>,
  snapshot:        NotificationSnapshot,
  shown_reminders: BTreeSet<u64>,
  dropdown:        DropdownState
}

impl AppContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn active_theme(
    &self
  ) -> Option<&'static str> {
    self.active_theme
  }

  pub(crate) fn set_active_theme(
    &mut self,
    id: &'static str
  ) {
    self.active_theme = Some(id);
  }

  pub fn snapshot(
    &self
  ) -> &NotificationSnapshot {
    &self.snapshot
  }

  /// Snapshots are never merged; the
  /// newest response wins.
  pub fn replace_snapshot(
    &mut self,
    snapshot: NotificationSnapshot
  ) {
    self.snapshot = snapshot;
  }

  pub fn reminder_shown(
    &self,
    task_id: u64
  ) -> bool {
    self
      .shown_reminders
      .contains(&task_id)
  }

  /// Returns `true` the first time a
  /// task id is recorded this session.
  pub fn mark_reminder_shown(
    &mut self,
    task_id: u64
  ) -> bool {
    self.shown_reminders.insert(task_id)
  }

  pub fn shown_reminder_count(
    &self
  ) -> usize {
    self.shown_reminders.len()
  }

  pub fn dropdown(
    &self
  ) -> DropdownState {
    self.dropdown
  }

  pub(crate) fn set_dropdown(
    &mut self,
    state: DropdownState
  ) {
    self.dropdown = state;
  }
}
