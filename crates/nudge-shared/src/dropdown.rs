//! Markup and placement for the
//! notification dropdown panel.

use url::form_urlencoded;

use crate::task::Task;

pub const DEFAULT_FILTER: &str =
  "today";
pub const EMPTY_PLACEHOLDER: &str =
  "No tasks to display.";
/// Vertical gap between the bell and
/// the panel, in CSS pixels.
pub const DROPDOWN_GAP: f64 = 8.0;

/// Escapes text for interpolation into
/// element content or attribute values.
pub fn escape_html(raw: &str) -> String {
  let mut out =
    String::with_capacity(raw.len());
  for ch in raw.chars() {
    match ch {
      | '&' => out.push_str("&amp;"),
      | '<' => out.push_str("&lt;"),
      | '>' => out.push_str("&gt;"),
      | '"' => out.push_str("&quot;"),
      | '\'' => out.push_str("&#39;"),
      | '/' => out.push_str("&#x2F;"),
      | '`' => out.push_str("&#x60;"),
      | '=' => out.push_str("&#x3D;"),
      | other => out.push(other)
    }
  }
  out
}

/// Reads `filter` from a page query
/// string (with or without the leading
/// `?`). Missing or empty means
/// [`DEFAULT_FILTER`].
pub fn current_filter(
  query: &str
) -> String {
  let query =
    query.strip_prefix('?').unwrap_or(query);
  form_urlencoded::parse(query.as_bytes())
    .find(|(key, _)| key == "filter")
    .map(|(_, value)| value.into_owned())
    .filter(|value| !value.is_empty())
    .unwrap_or_else(|| {
      DEFAULT_FILTER.to_string()
    })
}

fn encode_filter(filter: &str) -> String {
  form_urlencoded::byte_serialize(
    filter.as_bytes()
  )
  .collect()
}

pub fn edit_task_href(
  id: u64,
  filter: &str
) -> String {
  format!(
    "/edit/{id}/?filter={}",
    encode_filter(filter)
  )
}

pub fn delete_task_href(
  id: u64,
  filter: &str
) -> String {
  format!(
    "/delete/{id}/?filter={}",
    encode_filter(filter)
  )
}

/// ` on <date>` and/or ` at <time>`,
/// unescaped.
pub fn schedule_suffix(
  task: &Task
) -> Option<String> {
  let date = task
    .due_date
    .map(|date| format!(" on {date}"))
    .unwrap_or_default();
  let time = task
    .due_time
    .as_deref()
    .filter(|time| !time.is_empty())
    .map(|time| format!(" at {time}"))
    .unwrap_or_default();
  let suffix = date + &time;
  (!suffix.is_empty()).then_some(suffix)
}

/// Inner markup of the dropdown panel.
///
/// Every interpolated value is escaped,
/// so a task title cannot introduce
/// elements.
pub fn render_dropdown(
  tasks: &[Task],
  filter: &str
) -> String {
  if tasks.is_empty() {
    return format!(
      "<div class=\"notif-empty\">\
       {EMPTY_PLACEHOLDER}</div>"
    );
  }

  let mut html =
    String::from("<ul class=\"notif-list\">");
  for task in tasks {
    let href = escape_html(
      &edit_task_href(task.id, filter)
    );
    let title = escape_html(&task.title);
    html.push_str(&format!(
      "<li class=\"notif-item\"><a \
       href=\"{href}\"><span \
       class=\"task-title\">{title}</span>"
    ));
    if let Some(suffix) =
      schedule_suffix(task)
    {
      html.push_str(&format!(
        "<span class=\"task-time\">{}</\
         span>",
        escape_html(&suffix)
      ));
    }
    html.push_str("</a></li>");
  }
  html.push_str("</ul>");
  html
}

/// Viewport-relative box of the
/// triggering control.
#[derive(
  Debug, Clone, Copy, PartialEq, Default,
)]
pub struct AnchorRect {
  pub left:   f64,
  pub top:    f64,
  pub width:  f64,
  pub height: f64
}

impl AnchorRect {
  pub fn bottom(&self) -> f64 {
    self.top + self.height
  }

  pub fn center_x(&self) -> f64 {
    self.left + self.width / 2.0
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Default,
)]
pub struct ScrollOffset {
  pub x: f64,
  pub y: f64
}

/// Document-relative position of a
/// panel's top centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
  pub left: f64,
  pub top:  f64
}

impl Placement {
  /// Inline style for an absolutely
  /// positioned panel.
  pub fn style(&self) -> String {
    format!(
      "left: {}px; top: {}px; transform: \
       translateX(-50%);",
      self.left, self.top
    )
  }
}

/// Centres a panel under `anchor`,
/// [`DROPDOWN_GAP`] pixels below it.
pub fn dropdown_position(
  anchor: AnchorRect,
  scroll: ScrollOffset
) -> Placement {
  Placement {
    left: anchor.center_x() + scroll.x,
    top:  anchor.bottom()
      + DROPDOWN_GAP
      + scroll.y
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    AnchorRect,
    EMPTY_PLACEHOLDER,
    ScrollOffset,
    current_filter,
    delete_task_href,
    dropdown_position,
    edit_task_href,
    escape_html,
    render_dropdown,
    schedule_suffix
  };
  use crate::task::{
    Priority,
    Task
  };

  #[test]
  fn escapes_the_full_character_set() {
    assert_eq!(
      escape_html("a&b<c>d\"e'f/g`h=i"),
      "a&amp;b&lt;c&gt;d&quot;e&#39;f&#x2F;\
       g&#x60;h&#x3D;i"
    );
    assert_eq!(
      escape_html("plain ünïcode"),
      "plain ünïcode"
    );
  }

  #[test]
  fn script_title_is_rendered_as_text() {
    let tasks = vec![Task::new(
      1,
      "<script>",
      Priority::High
    )];
    let html = render_dropdown(&tasks, "today");
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
  }

  #[test]
  fn empty_list_shows_placeholder() {
    let html = render_dropdown(&[], "today");
    assert!(html.contains(EMPTY_PLACEHOLDER));
    assert!(!html.contains("<ul"));
  }

  #[test]
  fn items_link_to_edit_with_filter() {
    let mut task =
      Task::new(42, "Call mom", Priority::Low);
    task.due_date =
      NaiveDate::from_ymd_opt(2026, 10, 17);
    task.due_time = Some("09:30".into());

    let html = render_dropdown(
      std::slice::from_ref(&task),
      "week"
    );
    assert!(html.contains(
      "href=\"&#x2F;edit&#x2F;42&#x2F;?\
       filter&#x3D;week\""
    ));
    assert!(html.contains(
      "<span class=\"task-time\"> on \
       2026-10-17 at 09:30</span>"
    ));
  }

  #[test]
  fn suffix_is_omitted_without_schedule() {
    let task =
      Task::new(1, "Someday", Priority::Low);
    assert_eq!(schedule_suffix(&task), None);
    let html = render_dropdown(
      std::slice::from_ref(&task),
      "all"
    );
    assert!(!html.contains("task-time"));
  }

  #[test]
  fn filter_is_read_from_query() {
    assert_eq!(current_filter(""), "today");
    assert_eq!(
      current_filter("?filter="),
      "today"
    );
    assert_eq!(
      current_filter("?page=2&filter=week"),
      "week"
    );
    assert_eq!(
      current_filter("filter=this%20week"),
      "this week"
    );
  }

  #[test]
  fn hrefs_encode_the_filter() {
    assert_eq!(
      edit_task_href(3, "a&b"),
      "/edit/3/?filter=a%26b"
    );
    assert_eq!(
      delete_task_href(3, "today"),
      "/delete/3/?filter=today"
    );
  }

  #[test]
  fn panel_is_centred_below_the_anchor() {
    let anchor = AnchorRect {
      left:   100.0,
      top:    10.0,
      width:  40.0,
      height: 30.0
    };
    let placement = dropdown_position(
      anchor,
      ScrollOffset { x: 0.0, y: 200.0 }
    );
    assert_eq!(placement.left, 120.0);
    assert_eq!(placement.top, 248.0);
    assert_eq!(
      placement.style(),
      "left: 120px; top: 248px; transform: \
       translateX(-50%);"
    );
  }
}
