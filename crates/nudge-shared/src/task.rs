use std::fmt;

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High
}

impl Priority {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Low => "Low",
      | Self::Medium => "Medium",
      | Self::High => "High"
    }
  }

  pub fn css_class(
    self
  ) -> &'static str {
    match self {
      | Self::Low => "priority-low",
      | Self::Medium => {
        "priority-medium"
      }
      | Self::High => "priority-high"
    }
  }

  /// Unknown labels map to `Medium`,
  /// the backend's default priority.
  pub fn from_label(
    label: &str
  ) -> Self {
    match label
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "low" => Self::Low,
      | "high" => Self::High,
      | _ => Self::Medium
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for Priority {
  fn serialize<S>(
    &self,
    serializer: S
  ) -> Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    serializer
      .serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Priority {
  fn deserialize<D>(
    deserializer: D
  ) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>
  {
    let raw: Option<String> =
      lenient(deserializer)?;
    Ok(
      raw
        .as_deref()
        .map(Priority::from_label)
        .unwrap_or_default()
    )
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct Task {
  pub id:          u64,
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub title:       String,
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub description: Option<String>,
  #[serde(default)]
  pub priority:    Priority,
  #[serde(
    default,
    deserialize_with = "lenient_date"
  )]
  pub due_date:    Option<NaiveDate>,
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub due_time:    Option<String>,
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub completed:   bool
}

impl Task {
  pub fn new(
    id: u64,
    title: impl Into<String>,
    priority: Priority
  ) -> Self {
    Self {
      id,
      title: title.into(),
      description: None,
      priority,
      due_date: None,
      due_time: None,
      completed: false
    }
  }

  /// Description with blank values
  /// treated as absent.
  pub fn description_text(
    &self
  ) -> Option<&str> {
    self
      .description
      .as_deref()
      .map(str::trim)
      .filter(|text| !text.is_empty())
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct NotificationsResponse {
  #[serde(
    default,
    deserialize_with = "lenient_tasks"
  )]
  pub notifications: Vec<Task>
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct CountResponse {
  #[serde(
    default,
    deserialize_with = "lenient_count"
  )]
  pub count: Option<u64>,
  #[serde(
    default,
    deserialize_with = "lenient_tasks"
  )]
  pub tasks: Vec<Task>
}

/// The most recent `{count, tasks}`
/// pair. Always replaced wholesale.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct NotificationSnapshot {
  pub count: u64,
  pub tasks: Vec<Task>
}

impl From<CountResponse>
  for NotificationSnapshot
{
  fn from(
    response: CountResponse
  ) -> Self {
    Self {
      count: response
        .count
        .unwrap_or_default(),
      tasks: response.tasks
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Statistics {
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub total_completed:           u64,
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub tasks_completed_this_week: u64,
  #[serde(
    default,
    deserialize_with = "lenient"
  )]
  pub tasks_completed_today:     u64
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ToggleRequest {
  pub completed: bool
}

#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ToggleResponse {
  #[serde(default)]
  pub success:   bool,
  #[serde(default)]
  pub task_id:   Option<u64>,
  #[serde(default)]
  pub completed: Option<bool>,
  #[serde(default)]
  pub error:     Option<String>
}

/// Pending/completed counters shown
/// next to the task list.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct TaskCounters {
  pub pending:   u64,
  pub completed: u64
}

impl TaskCounters {
  pub fn from_tasks(
    tasks: &[Task]
  ) -> Self {
    let completed = tasks
      .iter()
      .filter(|task| task.completed)
      .count() as u64;
    Self {
      pending: tasks.len() as u64
        - completed,
      completed
    }
  }

  /// Moves one task between the two
  /// counters without a reload.
  pub fn apply_toggle(
    &mut self,
    completed: bool
  ) {
    if completed {
      self.pending =
        self.pending.saturating_sub(1);
      self.completed =
        self.completed.saturating_add(1);
    } else {
      self.pending =
        self.pending.saturating_add(1);
      self.completed = self
        .completed
        .saturating_sub(1);
    }
  }

  /// Thirty minutes per task, as the
  /// list header estimates it.
  pub fn estimated_minutes(
    &self
  ) -> u64 {
    self.pending.saturating_mul(30)
  }
}

/// A value of the expected shape, or
/// anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
  Valid(T),
  Malformed(IgnoredAny)
}

/// Missing, null and wrong-typed values
/// all become `T::default()`.
fn lenient<'de, D, T>(
  deserializer: D
) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default
{
  match Lenient::<T>::deserialize(
    deserializer
  )? {
    | Lenient::Valid(value) => Ok(value),
    | Lenient::Malformed(_) => {
      tracing::debug!(
        expected = std::any::type_name::<T>(),
        "defaulting malformed field"
      );
      Ok(T::default())
    }
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountValue {
  Number(u64),
  Text(String),
  Malformed(IgnoredAny)
}

/// Counts sent as numeric strings are
/// read; other shapes count as absent.
fn lenient_count<'de, D>(
  deserializer: D
) -> Result<Option<u64>, D::Error>
where
  D: Deserializer<'de>
{
  let count =
    match Option::<CountValue>::deserialize(
      deserializer
    )? {
      | Some(CountValue::Number(count)) => {
        Some(count)
      }
      | Some(CountValue::Text(raw)) => {
        raw.trim().parse().ok()
      }
      | Some(CountValue::Malformed(_))
      | None => None
    };
  Ok(count)
}

/// Keeps every well-formed task. A bad
/// entry is dropped on its own; a
/// non-list value reads as empty.
fn lenient_tasks<'de, D>(
  deserializer: D
) -> Result<Vec<Task>, D::Error>
where
  D: Deserializer<'de>
{
  let entries: Vec<Lenient<Task>> =
    lenient(deserializer)?;
  let total = entries.len();
  let tasks: Vec<Task> = entries
    .into_iter()
    .filter_map(|entry| {
      match entry {
        | Lenient::Valid(task) => {
          Some(task)
        }
        | Lenient::Malformed(_) => None
      }
    })
    .collect();
  if tasks.len() < total {
    tracing::warn!(
      skipped = total - tasks.len(),
      kept = tasks.len(),
      "skipping malformed tasks"
    );
  }
  Ok(tasks)
}

fn lenient_date<'de, D>(
  deserializer: D
) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>
{
  let raw: Option<String> =
    lenient(deserializer)?;
  let Some(raw) = raw else {
    return Ok(None);
  };

  match NaiveDate::parse_from_str(
    raw.trim(),
    "%Y-%m-%d"
  ) {
    | Ok(date) => Ok(Some(date)),
    | Err(error) => {
      tracing::debug!(
        %error,
        raw = %raw,
        "ignoring malformed due date"
      );
      Ok(None)
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    CountResponse,
    NotificationSnapshot,
    NotificationsResponse,
    Priority,
    Statistics,
    Task,
    TaskCounters
  };

  #[test]
  fn decodes_count_payload_from_backend()
  {
    let raw = r#"{
      "count": 2,
      "tasks": [
        {"id": 7, "title": "Pay bills", "due_date": "2026-10-17", "due_time": "09:30", "priority": "High"},
        {"id": 8, "title": "Call mom", "due_date": null, "due_time": null, "priority": "Low"}
      ]
    }"#;

    let response: CountResponse =
      serde_json::from_str(raw)
        .expect("decode count");
    let snapshot =
      NotificationSnapshot::from(
        response
      );

    assert_eq!(snapshot.count, 2);
    assert_eq!(
      snapshot.tasks[0].due_date,
      NaiveDate::from_ymd_opt(
        2026, 10, 17
      )
    );
    assert_eq!(
      snapshot.tasks[0].priority,
      Priority::High
    );
    assert_eq!(
      snapshot.tasks[1].due_date,
      None
    );
  }

  #[test]
  fn missing_fields_fall_back_to_defaults()
  {
    let response: CountResponse =
      serde_json::from_str(
        r#"{"tasks": null}"#
      )
      .expect("decode count");
    let snapshot =
      NotificationSnapshot::from(
        response
      );
    assert_eq!(snapshot.count, 0);
    assert!(snapshot.tasks.is_empty());

    let due: NotificationsResponse =
      serde_json::from_str("{}")
        .expect("decode notifications");
    assert!(
      due.notifications.is_empty()
    );

    let stats: Statistics =
      serde_json::from_str(
        r#"{"total_completed": 4}"#
      )
      .expect("decode statistics");
    assert_eq!(stats.total_completed, 4);
    assert_eq!(
      stats.tasks_completed_today,
      0
    );
  }

  #[test]
  fn unknown_priority_and_bad_date_are_tolerated()
  {
    let task: Task = serde_json::from_str(
      r#"{"id": 3, "title": "x", "priority": "Urgent", "due_date": "soon", "description": "  "}"#,
    )
    .expect("decode task");
    assert_eq!(
      task.priority,
      Priority::Medium
    );
    assert_eq!(task.due_date, None);
    assert_eq!(
      task.description_text(),
      None
    );
  }

  #[test]
  fn wrong_typed_count_and_tasks_are_defaulted()
  {
    let text: CountResponse =
      serde_json::from_str(
        r#"{"count": "3", "tasks": []}"#
      )
      .expect("decode count");
    assert_eq!(
      NotificationSnapshot::from(text)
        .count,
      3
    );

    let junk: CountResponse =
      serde_json::from_str(
        r#"{"count": {"n": 3}, "tasks": "oops"}"#
      )
      .expect("decode count");
    let snapshot =
      NotificationSnapshot::from(junk);
    assert_eq!(snapshot.count, 0);
    assert!(snapshot.tasks.is_empty());

    let stats: Statistics =
      serde_json::from_str(
        r#"{"total_completed": "lots", "tasks_completed_today": 2}"#
      )
      .expect("decode statistics");
    assert_eq!(stats.total_completed, 0);
    assert_eq!(
      stats.tasks_completed_today,
      2
    );
  }

  #[test]
  fn one_bad_field_keeps_the_rest_of_the_batch()
  {
    let due: NotificationsResponse =
      serde_json::from_str(
        r#"{"notifications": [
          {"id": 7, "title": "Pay bills", "due_time": 5, "description": false, "priority": 2},
          {"title": "no id"},
          {"id": 8, "title": "Call mom", "due_date": 20261017, "completed": "yes"}
        ]}"#
      )
      .expect("decode notifications");

    let ids: Vec<_> = due
      .notifications
      .iter()
      .map(|task| task.id)
      .collect();
    assert_eq!(ids, vec![7, 8]);

    let first = &due.notifications[0];
    assert_eq!(first.title, "Pay bills");
    assert_eq!(first.due_time, None);
    assert_eq!(first.description, None);
    assert_eq!(
      first.priority,
      Priority::Medium
    );

    let second = &due.notifications[1];
    assert_eq!(second.due_date, None);
    assert!(!second.completed);
  }

  #[test]
  fn counters_move_one_task_and_saturate()
  {
    let mut counters = TaskCounters {
      pending:   1,
      completed: 0
    };
    counters.apply_toggle(true);
    assert_eq!(
      counters,
      TaskCounters {
        pending:   0,
        completed: 1
      }
    );
    counters.apply_toggle(true);
    assert_eq!(counters.pending, 0);
    assert_eq!(counters.completed, 2);
    counters.apply_toggle(false);
    assert_eq!(counters.pending, 1);
    assert_eq!(
      counters.estimated_minutes(),
      30
    );
  }
}
