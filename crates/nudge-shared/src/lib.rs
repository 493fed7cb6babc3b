pub mod chat;
pub mod context;
pub mod csrf;
pub mod daily;
pub mod dropdown;
pub mod endpoints;
pub mod error;
pub mod notify;
pub mod prefs;
pub mod schedule;
pub mod task;
pub mod theme;

pub use context::{
  AppContext,
  DropdownState
};
pub use error::{
  BackendError,
  PreferenceError
};
pub use notify::{
  Backend,
  NotificationPermission,
  NotificationPoller,
  NotificationView,
  Reminder
};
pub use prefs::{
  MemoryStore,
  PreferenceStore
};
pub use schedule::{
  Scheduler,
  TimerHandle
};
pub use task::{
  NotificationSnapshot,
  Priority,
  Statistics,
  Task,
  TaskCounters
};
pub use theme::{
  StyleScope,
  StyleSheet,
  ThemeDefinition,
  ThemeEngine
};
