use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anyhow::{
  Context,
  anyhow
};
use reqwest::Url;
use tracing::{
  debug,
  info,
  trace,
  warn
};

pub const DEFAULT_SERVER_URL: &str =
  "http://127.0.0.1:8000";

const DEFAULTS: &[(&str, &str)] = &[
  ("server.url", DEFAULT_SERVER_URL),
  ("data.location", "~/.nudge"),
  ("default.command", "notifications"),
  ("poll.due.seconds", "60"),
  ("poll.count.seconds", "5"),
  ("list.filter", "today"),
  ("request.timeout.seconds", "10"),
  ("color", "on"),
  ("notifications.desktop", "on")
];

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      map:          DEFAULTS
        .iter()
        .map(|(k, v)| {
          (k.to_string(), v.to_string())
        })
        .collect(),
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    nudgerc_override
  ))]
  pub fn load(
    nudgerc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let nudgerc = resolve_nudgerc_path(
      nudgerc_override
    )?;
    if let Some(path) = nudgerc {
      info!(nudgerc = %path.display(), "loading nudgerc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no nudgerc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  /// Strict on/off parsing; anything
  /// unrecognised is an error.
  pub fn get_bool(
    &self,
    key: &str
  ) -> anyhow::Result<bool> {
    let raw = self.require(key)?;
    parse_bool(&raw).ok_or_else(|| {
      anyhow!(
        "invalid {key} setting: {raw}"
      )
    })
  }

  /// Whole seconds, at least one.
  pub fn get_seconds(
    &self,
    key: &str
  ) -> anyhow::Result<Duration> {
    let raw = self.require(key)?;
    let secs: u64 = raw
      .trim()
      .parse()
      .with_context(|| {
        format!(
          "invalid {key} setting: {raw}"
        )
      })?;
    if secs == 0 {
      return Err(anyhow!(
        "{key} must be at least 1"
      ));
    }
    Ok(Duration::from_secs(secs))
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&String, &String)>
  {
    self.map.iter()
  }

  fn require(
    &self,
    key: &str
  ) -> anyhow::Result<String> {
    self.get(key).ok_or_else(|| {
      anyhow!("missing setting: {key}")
    })
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let line = raw_line
        .split_once('#')
        .map_or(raw_line, |(before, _)| {
          before
        })
        .trim();
      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path == path
          || self
            .loaded_files
            .contains(&include_path)
        {
          warn!(include = %include_path.display(), "include already loaded; skipping");
        } else if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

/// Everything the commands read from
/// the configuration, validated once.
#[derive(Debug, Clone)]
pub struct Settings {
  pub server:          Url,
  pub data_dir:        PathBuf,
  pub default_command: String,
  pub due_period:      Duration,
  pub count_period:    Duration,
  pub list_filter:     String,
  pub request_timeout: Duration,
  pub desktop:         bool
}

impl Settings {
  #[tracing::instrument(skip_all)]
  pub fn from_config(
    cfg: &Config,
    data_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let data_dir =
      resolve_data_dir(cfg, data_override)
        .context(
          "failed to resolve data \
           directory"
        )?;
    let settings = Self {
      server: resolve_server_url(cfg)?,
      data_dir,
      default_command: cfg
        .get("default.command")
        .unwrap_or_else(|| {
          "notifications".to_string()
        }),
      due_period: cfg
        .get_seconds("poll.due.seconds")?,
      count_period: cfg.get_seconds(
        "poll.count.seconds"
      )?,
      list_filter: cfg
        .get("list.filter")
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| {
          "today".to_string()
        }),
      request_timeout: cfg.get_seconds(
        "request.timeout.seconds"
      )?,
      desktop: cfg
        .get_bool("notifications.desktop")?
    };
    debug!(?settings, "resolved settings");
    Ok(settings)
  }
}

/// `server.url`, which must be an
/// absolute http(s) URL. A missing
/// trailing slash is added so endpoint
/// paths join under it.
pub fn resolve_server_url(
  cfg: &Config
) -> anyhow::Result<Url> {
  let raw = cfg
    .get("server.url")
    .unwrap_or_else(|| {
      DEFAULT_SERVER_URL.to_string()
    });
  let mut url = Url::parse(raw.trim())
    .with_context(|| {
      format!(
        "invalid server.url setting: \
         {raw}"
      )
    })?;
  if !matches!(
    url.scheme(),
    "http" | "https"
  ) {
    return Err(anyhow!(
      "server.url must be http or \
       https: {raw}"
    ));
  }
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

#[tracing::instrument(skip(
  cfg,
  override_dir
))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(cfg_value) =
    cfg.get("data.location")
  {
    expand_tilde(Path::new(&cfg_value))
  } else {
    default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_nudgerc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(nudgerc_env) =
    std::env::var("NUDGERC")
  {
    if nudgerc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      nudgerc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping nudgerc"
    );
    return Ok(None);
  };
  let candidate = home.join(".nudgerc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let home = dirs::home_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine home \
         directory"
      )
    })?;
  Ok(home.join(".nudge"))
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

pub(crate) fn parse_bool(
  s: &str
) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on" | "true" => {
      Some(true)
    }
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use std::fs;
  use std::time::Duration;

  use tempfile::tempdir;

  use super::{
    Config,
    Settings,
    parse_bool,
    resolve_server_url
  };

  #[test]
  fn defaults_cover_every_setting() {
    let cfg = Config::default();
    assert_eq!(
      cfg.get("server.url").as_deref(),
      Some("http://127.0.0.1:8000")
    );
    assert_eq!(
      cfg
        .get_seconds("poll.due.seconds")
        .expect("due"),
      Duration::from_secs(60)
    );
    assert_eq!(
      cfg
        .get_seconds("poll.count.seconds")
        .expect("count"),
      Duration::from_secs(5)
    );
    assert!(cfg.get_bool("color").expect("color"));
  }

  #[test]
  fn rc_file_with_include_and_comments() {
    let temp = tempdir().expect("tempdir");
    let extra = temp.path().join("extra.rc");
    fs::write(
      &extra,
      "poll.count.seconds = 15\n"
    )
    .expect("write include");
    let main = temp.path().join("nudgerc");
    fs::write(
      &main,
      "# server\nserver.url = \
       https://tasks.example.com/app # \
       trailing\n\ninclude extra.rc\n\
       color=off\n"
    )
    .expect("write rc");

    let cfg =
      Config::load(Some(&main)).expect("load");
    assert_eq!(cfg.loaded_files.len(), 2);
    assert_eq!(
      cfg.get("server.url").as_deref(),
      Some("https://tasks.example.com/app")
    );
    assert_eq!(
      cfg
        .get_seconds("poll.count.seconds")
        .expect("count"),
      Duration::from_secs(15)
    );
    assert!(
      !cfg.get_bool("color").expect("color")
    );
  }

  #[test]
  fn malformed_line_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let main = temp.path().join("nudgerc");
    fs::write(&main, "just words\n")
      .expect("write rc");
    let err = Config::load(Some(&main))
      .expect_err("invalid line");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::default();
    cfg.apply_overrides([
      (
        "rc.poll.due.seconds".to_string(),
        "0".to_string()
      ),
      (
        "list.filter".to_string(),
        "week".to_string()
      )
    ]);
    assert!(
      cfg
        .get_seconds("poll.due.seconds")
        .is_err()
    );
    assert_eq!(
      cfg.get("list.filter").as_deref(),
      Some("week")
    );
  }

  #[test]
  fn server_url_gets_a_trailing_slash() {
    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "server.url".to_string(),
      "http://host:9000/todo".to_string()
    )]);
    let url =
      resolve_server_url(&cfg).expect("url");
    assert_eq!(
      url.as_str(),
      "http://host:9000/todo/"
    );

    cfg.apply_overrides([(
      "server.url".to_string(),
      "ftp://host".to_string()
    )]);
    assert!(resolve_server_url(&cfg).is_err());
  }

  #[test]
  fn settings_use_data_override() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path().join("data");
    let settings = Settings::from_config(
      &Config::default(),
      Some(&data)
    )
    .expect("settings");
    assert!(data.is_dir());
    assert_eq!(settings.data_dir, data);
    assert_eq!(settings.list_filter, "today");
    assert!(settings.desktop);
  }

  #[test]
  fn bool_parsing_is_strict() {
    assert_eq!(parse_bool(" Yes "), Some(true));
    assert_eq!(parse_bool("off"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
  }
}
