use url::form_urlencoded;

pub const CSRF_COOKIE: &str =
  "csrftoken";
pub const CSRF_HEADER: &str =
  "X-CSRFToken";

/// Looks up a cookie in a
/// `name=value; other=value` header and
/// percent-decodes its value.
pub fn cookie_value(
  cookie_header: &str,
  name: &str
) -> Option<String> {
  cookie_header
    .split(';')
    .map(str::trim)
    .find_map(|pair| {
      let (key, value) =
        pair.split_once('=')?;
      (key == name)
        .then(|| decode_component(value))
    })
}

pub fn csrf_token(
  cookie_header: &str
) -> Option<String> {
  cookie_value(
    cookie_header,
    CSRF_COOKIE
  )
  .filter(|token| !token.is_empty())
}

// form decoding turns '+' into a space
// and splits on '&'; cookie values keep
// both literally.
fn decode_component(
  raw: &str
) -> String {
  let escaped = raw
    .replace('+', "%2B")
    .replace('&', "%26");
  form_urlencoded::parse(
    format!("v={escaped}").as_bytes()
  )
  .next()
  .map(|(_, value)| value.into_owned())
  .unwrap_or_default()
}
