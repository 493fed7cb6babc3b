use std::rc::Rc;

use nudge_shared::notify::{
  NotificationPermission,
  NotificationView,
  Reminder
};
use nudge_shared::task::NotificationSnapshot;
use yew::{
  Callback,
  Reducible
};

use super::browser;

/// Popups on screen. Each push gets its
/// own key so repeated reminders for one
/// task stack instead of replacing each
/// other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReminderStack {
  next_key: u64,
  pub open: Vec<(u64, Reminder)>
}

pub enum ReminderAction {
  Push(Reminder),
  Dismiss(u64)
}

impl Reducible for ReminderStack {
  type Action = ReminderAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    match action {
      | ReminderAction::Push(reminder) => {
        next
          .open
          .push((next.next_key, reminder));
        next.next_key += 1;
      }
      | ReminderAction::Dismiss(key) => {
        next
          .open
          .retain(|(open, _)| *open != key);
      }
    }
    Rc::new(next)
  }
}

/// Bridges poller output into component
/// state. Cheap to clone into async
/// tasks and event listeners.
#[derive(Clone, PartialEq)]
pub struct PageView {
  pub on_reminder: Callback<Reminder>,
  pub on_badge:    Callback<u64>,
  /// `Some(markup)` shows the panel,
  /// `None` removes it.
  pub on_dropdown: Callback<Option<String>>,
  pub filter:      String
}

impl NotificationView for PageView {
  fn show_reminder(
    &mut self,
    reminder: &Reminder
  ) {
    self.on_reminder.emit(reminder.clone());
  }

  fn set_badge(&mut self, count: u64) {
    self.on_badge.emit(count);
  }

  fn render_dropdown(
    &mut self,
    _snapshot: &NotificationSnapshot,
    markup: &str
  ) {
    self
      .on_dropdown
      .emit(Some(markup.to_string()));
  }

  fn close_dropdown(&mut self) {
    self.on_dropdown.emit(None);
  }

  fn current_filter(&self) -> String {
    self.filter.clone()
  }

  fn desktop_permission(
    &self
  ) -> NotificationPermission {
    browser::desktop_permission()
  }

  fn request_desktop_permission(
    &mut self
  ) {
    browser::request_desktop_permission();
  }

  fn mirror_to_desktop(
    &mut self,
    reminder: &Reminder
  ) -> Result<(), String> {
    browser::emit_desktop_notification(
      reminder
    )
  }
}
