mod api;
mod app;
mod components;

/// Element the widgets mount into; the
/// host page supplies it.
const MOUNT_ID: &str = "nudge-root";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting nudge page widgets"
  );

  let Some(mount) = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document.get_element_by_id(MOUNT_ID)
    })
  else {
    tracing::error!(
      mount = MOUNT_ID,
      "missing mount element"
    );
    return;
  };

  yew::Renderer::<app::App>::with_root(
    mount
  )
  .render();
}
