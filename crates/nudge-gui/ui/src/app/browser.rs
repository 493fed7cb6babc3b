use nudge_shared::dropdown::{
  AnchorRect,
  ScrollOffset,
  current_filter
};
use nudge_shared::error::PreferenceError;
use nudge_shared::notify::{
  NotificationPermission,
  REMINDER_ICON,
  REMINDER_TITLE,
  Reminder
};
use nudge_shared::prefs::PreferenceStore;
use nudge_shared::task::TaskCounters;
use nudge_shared::theme::{
  DARK_MODE_CLASS,
  StyleScope
};
use wasm_bindgen::JsCast;

const STAT_VALUE_SELECTOR: &str =
  ".stat-card .stat-value";

/// Inline custom properties on the root
/// element plus the body's dark class.
#[derive(Debug, Default)]
pub struct DocumentStyle;

impl StyleScope for DocumentStyle {
  fn set_variable(
    &mut self,
    name: &str,
    value: &str
  ) {
    let Some(root) = web_sys::window()
      .and_then(|window| {
        window.document()
      })
      .and_then(|document| {
        document.document_element()
      })
      .and_then(|element| {
        element
          .dyn_into::<web_sys::HtmlElement>(
          )
          .ok()
      })
    else {
      return;
    };

    if let Err(error) = root
      .style()
      .set_property(name, value)
    {
      tracing::warn!(
        error = ?error,
        name,
        "failed to set style variable"
      );
    }
  }

  fn set_dark_mode(
    &mut self,
    enabled: bool
  ) {
    let Some(body) = web_sys::window()
      .and_then(|window| {
        window.document()
      })
      .and_then(|document| document.body())
    else {
      return;
    };

    if let Err(error) = body
      .class_list()
      .toggle_with_force(
        DARK_MODE_CLASS,
        enabled
      )
    {
      tracing::warn!(
        error = ?error,
        "failed to toggle dark theme class"
      );
    }
  }
}

fn local_storage()
-> Option<web_sys::Storage> {
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

/// `window.localStorage`. Reads from an
/// unavailable storage yield nothing.
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl PreferenceStore for LocalStorageStore {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    local_storage().and_then(|storage| {
      storage
        .get_item(key)
        .ok()
        .flatten()
    })
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), PreferenceError> {
    let storage = local_storage()
      .ok_or_else(|| {
        PreferenceError::Unavailable(
          "localStorage is not available"
            .to_string()
        )
      })?;
    storage.set_item(key, value).map_err(
      |error| PreferenceError::Write {
        key:     key.to_string(),
        message: format!("{error:?}")
      }
    )
  }
}

pub fn document_cookies() -> String {
  web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
    })
    .and_then(|document| {
      document.cookie().ok()
    })
    .unwrap_or_default()
}

/// The list filter of the page the
/// widgets are mounted in.
pub fn page_filter() -> String {
  let search = web_sys::window()
    .and_then(|window| {
      window.location().search().ok()
    })
    .unwrap_or_default();
  current_filter(&search)
}

pub fn anchor_rect(
  element: &web_sys::Element
) -> AnchorRect {
  let rect =
    element.get_bounding_client_rect();
  AnchorRect {
    left:   rect.left(),
    top:    rect.top(),
    width:  rect.width(),
    height: rect.height()
  }
}

pub fn scroll_offset() -> ScrollOffset {
  web_sys::window()
    .map(|window| {
      ScrollOffset {
        x: window
          .scroll_x()
          .unwrap_or_default(),
        y: window
          .scroll_y()
          .unwrap_or_default()
      }
    })
    .unwrap_or_default()
}

pub fn desktop_permission()
-> NotificationPermission {
  let Some(window) = web_sys::window()
  else {
    return NotificationPermission::Unsupported;
  };

  let has_notification =
    js_sys::Reflect::has(
      window.as_ref(),
      &wasm_bindgen::JsValue::from_str(
        "Notification"
      )
    )
    .ok()
    .unwrap_or(false);

  if !has_notification {
    return NotificationPermission::Unsupported;
  }

  match web_sys::Notification::permission()
  {
    | web_sys::NotificationPermission::Default => {
      NotificationPermission::Default
    }
    | web_sys::NotificationPermission::Granted => {
      NotificationPermission::Granted
    }
    | web_sys::NotificationPermission::Denied => {
      NotificationPermission::Denied
    }
    | _ => {
      NotificationPermission::Unsupported
    }
  }
}

/// Starts the browser prompt. The answer
/// is read back through
/// [`desktop_permission`] when needed.
pub fn request_desktop_permission() {
  match web_sys::Notification::request_permission()
  {
    | Ok(promise) => {
      wasm_bindgen_futures::spawn_local(
        async move {
          match wasm_bindgen_futures::JsFuture::from(promise).await {
            | Ok(_) => {
              tracing::info!(
                permission = desktop_permission().label(),
                "notification permission request completed"
              );
            }
            | Err(error) => {
              tracing::error!(
                error = ?error,
                "notification permission request failed"
              );
            }
          }
        }
      );
    }
    | Err(error) => {
      tracing::error!(
        error = ?error,
        "failed starting notification \
         permission request"
      );
    }
  }
}

pub fn emit_desktop_notification(
  reminder: &Reminder
) -> Result<(), String> {
  let options =
    web_sys::NotificationOptions::new();
  options.set_body(&reminder.message());
  options.set_icon(REMINDER_ICON);

  web_sys::Notification::new_with_options(
    REMINDER_TITLE,
    &options
  )
  .map(|_| ())
  .map_err(|error| format!("{error:?}"))
}

fn stat_value_elements()
-> Vec<web_sys::Element> {
  let Some(list) = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document
        .query_selector_all(
          STAT_VALUE_SELECTOR
        )
        .ok()
    })
  else {
    return Vec::new();
  };

  (0..list.length())
    .filter_map(|idx| list.item(idx))
    .filter_map(|node| {
      node.dyn_into::<web_sys::Element>().ok()
    })
    .collect()
}

/// Moves the page's pending/completed
/// stat cards after a toggle. Pages
/// without them are left alone.
pub fn update_stat_counters(
  completed: bool
) {
  let cards = stat_value_elements();
  let [pending_el, completed_el, ..] =
    cards.as_slice()
  else {
    return;
  };

  let read = |element: &web_sys::Element| {
    element
      .text_content()
      .and_then(|text| {
        text.trim().parse::<u64>().ok()
      })
      .unwrap_or_default()
  };

  let mut counters = TaskCounters {
    pending:   read(pending_el),
    completed: read(completed_el)
  };
  counters.apply_toggle(completed);

  pending_el.set_text_content(Some(
    &counters.pending.to_string()
  ));
  completed_el.set_text_content(Some(
    &counters.completed.to_string()
  ));
}

/// Marks the list row of a toggled task.
pub fn mark_task_row(
  task_id: u64,
  completed: bool
) {
  let selector =
    format!("[data-task-id=\"{task_id}\"]");
  let row = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document
        .query_selector(&selector)
        .ok()
        .flatten()
    });
  if let Some(row) = row
    && let Err(error) = row
      .class_list()
      .toggle_with_force(
        "task-completed",
        completed
      )
  {
    tracing::warn!(
      error = ?error,
      task_id,
      "failed to mark task row"
    );
  }
}
