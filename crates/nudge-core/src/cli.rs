use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nudge",
    version,
    about = "Nudge: due-task reminders, themes and a daily message for your task list",
    disable_help_subcommand = true,
    infer_subcommands = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "nudgerc")]
    pub nudgerc: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    /// Base URL of the task server.
    #[arg(long = "server")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Poll for due tasks and the badge count until interrupted.
    Watch,
    /// Show the tasks behind the notification badge.
    Notifications {
        /// Print the dropdown markup instead of a table.
        #[arg(long)]
        html: bool,
    },
    /// List the available themes.
    Themes,
    /// Select a theme.
    Theme {
        id: String,
        /// Also write the theme's variables to theme.css in the data directory.
        #[arg(long)]
        css: bool,
    },
    /// Print today's motivational message.
    Word {
        /// Only print it if it has not been shown today.
        #[arg(long)]
        auto: bool,
    },
    /// Ask the productivity assistant. Without text, starts a prompt.
    Chat {
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Show completion statistics.
    Stats,
    /// Mark a task completed.
    Toggle {
        id: u64,
        /// Mark it pending again instead.
        #[arg(long)]
        undo: bool,
    },
}

impl Command {
    /// Commands that can stand in for a missing one via `default.command`.
    pub fn from_default_name(name: &str) -> Option<Self> {
        match name.trim() {
            "watch" => Some(Self::Watch),
            "notifications" => Some(Self::Notifications { html: false }),
            "themes" => Some(Self::Themes),
            "word" => Some(Self::Word { auto: false }),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Notifications { .. } => "notifications",
            Self::Themes => "themes",
            Self::Theme { .. } => "theme",
            Self::Word { .. } => "word",
            Self::Chat { .. } => "chat",
            Self::Stats => "stats",
            Self::Toggle { .. } => "toggle",
        }
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Pulls positional `rc.key=value` / `rc.key:value` tokens out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> anyhow::Result<PreprocessedArgs> {
    let mut cleaned = Vec::with_capacity(raw.len());
    let mut overrides: Vec<(String, String)> = Vec::new();

    let mut iter = raw.iter().cloned();
    if let Some(bin) = iter.next() {
        cleaned.push(bin);
    }

    for arg in iter {
        let s = arg.to_string_lossy();
        if let Some(rest) = s.strip_prefix("rc.") {
            let parsed = rest
                .split_once('=')
                .or_else(|| rest.split_once(':'))
                .map(|(k, v)| (format!("rc.{k}"), v.to_string()));

            if let Some((k, v)) = parsed {
                debug!(key = %k, value = %v, "captured positional rc override");
                overrides.push((k, v));
                continue;
            }
        }

        cleaned.push(arg);
    }

    Ok(PreprocessedArgs {
        cleaned_args: cleaned,
        rc_overrides: overrides,
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::Parser;

    use super::{Command, GlobalCli, preprocess_args};

    fn args(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn positional_rc_overrides_are_extracted() {
        let pre = preprocess_args(&args(&[
            "nudge",
            "rc.color=off",
            "watch",
            "rc.poll.count.seconds:10",
        ]))
        .expect("preprocess");

        assert_eq!(pre.cleaned_args, args(&["nudge", "watch"]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.color".to_string(), "off".to_string()),
                ("rc.poll.count.seconds".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn subcommands_parse_and_abbreviate() {
        let cli = GlobalCli::parse_from(["nudge", "-vv", "theme", "dracula", "--css"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Theme {
                id: "dracula".to_string(),
                css: true,
            })
        );

        let cli = GlobalCli::parse_from(["nudge", "notif", "--html"]);
        assert_eq!(cli.command, Some(Command::Notifications { html: true }));

        let cli = GlobalCli::parse_from(["nudge", "chat", "how", "do", "I", "focus?"]);
        assert_eq!(
            cli.command.map(|c| c.name()),
            Some("chat")
        );
    }

    #[test]
    fn rc_flag_collects_key_values() {
        let cli = GlobalCli::parse_from([
            "nudge",
            "--rc",
            "server.url=http://tasks.local",
            "--rc",
            "color = off",
            "stats",
        ]);
        let pairs: Vec<_> = cli
            .rc_overrides
            .iter()
            .map(|kv| (kv.key.as_str(), kv.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("server.url", "http://tasks.local"), ("color", "off")]
        );
    }

    #[test]
    fn only_argument_free_commands_can_be_defaults() {
        assert_eq!(Command::from_default_name("watch"), Some(Command::Watch));
        assert_eq!(Command::from_default_name("toggle"), None);
        assert_eq!(Command::from_default_name("nope"), None);
    }
}
