//! Backend paths consumed by the
//! client.

pub const NOTIFICATIONS_PATH: &str =
  "/api/notifications/";
pub const NOTIFICATION_COUNT_PATH:
  &str = "/api/notifications/count/";
pub const STATISTICS_PATH: &str =
  "/api/statistics/";
/// Any page that sets the CSRF cookie.
pub const TASK_LIST_PATH: &str =
  "/tasks/";
pub const CACHE_BUST_PARAM: &str = "_";

pub fn toggle_task_path(
  id: u64
) -> String {
  format!("/api/toggle-task/{id}/")
}

pub fn notification_count_fresh_path(
  cache_bust: i64
) -> String {
  format!(
    "{NOTIFICATION_COUNT_PATH}?\
     {CACHE_BUST_PARAM}={cache_bust}"
  )
}
