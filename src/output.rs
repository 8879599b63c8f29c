//! # Output Configuration
//!
//! Controls how progress lines look on the operator's terminal. The external
//! tools print their own output; this module only decides how the tool's
//! own header, plan, and summary lines are decorated.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use crate::orchestrator::Action;
use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

/// Kinds of progress line the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Start,
    Run,
    UpToDate,
    Remove,
    Success,
    Failure,
}

impl From<Action> for Status {
    fn from(action: Action) -> Self {
        match action {
            Action::Run => Status::Run,
            Action::UpToDate => Status::UpToDate,
            Action::Remove => Status::Remove,
            Action::Missing => Status::Failure,
        }
    }
}

impl OutputConfig {
    /// Create an output configuration from the process environment and the
    /// `--color` flag (`always`, `never`, or `auto`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        Self::from_lookup_and_flag(color_flag, |key| std::env::var(key).ok(), || {
            console::Term::stdout().features().colors_supported()
        })
    }

    /// Like [`OutputConfig::from_env_and_flag`], with the environment and
    /// terminal detection supplied by the caller.
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set (any value,
    /// including empty), `CLICOLOR=0`, or `TERM=dumb`. `CLICOLOR_FORCE`
    /// forces them on; otherwise `terminal_supports_color` decides.
    pub fn from_lookup_and_flag<F, T>(color_flag: &str, lookup: F, terminal_supports_color: T) -> Self
    where
        F: Fn(&str) -> Option<String>,
        T: FnOnce() -> bool,
    {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => {
                if lookup("NO_COLOR").is_some() {
                    false
                } else if lookup("CLICOLOR").is_some_and(|v| v == "0") {
                    false
                } else if lookup("CLICOLOR_FORCE").is_some_and(|v| v != "0" && !v.is_empty()) {
                    true
                } else if lookup("TERM").is_some_and(|v| v == "dumb") {
                    false
                } else {
                    terminal_supports_color()
                }
            }
        };

        Self { use_color }
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Leading tag for a progress line.
    pub fn tag(&self, status: Status) -> &'static str {
        let (fancy, plain) = match status {
            Status::Start => ("🐍", "[PROVISION]"),
            Status::Run => ("🔨", "[RUN]"),
            Status::UpToDate => ("✔️ ", "[OK]"),
            Status::Remove => ("🧹", "[CLEAN]"),
            Status::Success => ("✅", "[DONE]"),
            Status::Failure => ("❌", "[FAILED]"),
        };
        emoji(self, fancy, plain)
    }

    /// A target name, emphasized when colors are on.
    pub fn target_name(&self, name: &str) -> String {
        if self.use_color {
            style(name).bold().to_string()
        } else {
            name.to_string()
        }
    }

    /// A full progress line: tag, then message.
    pub fn line(&self, status: Status, message: &str) -> String {
        format!("{} {}", self.tag(status), message)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn auto_with(pairs: &[(&str, &str)], tty: bool) -> OutputConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        OutputConfig::from_lookup_and_flag("auto", |key| env.get(key).cloned(), || tty)
    }

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_auto_follows_terminal() {
        assert!(auto_with(&[], true).use_color);
        assert!(!auto_with(&[], false).use_color);
    }

    #[test]
    fn test_auto_no_color_even_empty() {
        assert!(!auto_with(&[("NO_COLOR", "")], true).use_color);
    }

    #[test]
    fn test_auto_clicolor_and_term() {
        assert!(!auto_with(&[("CLICOLOR", "0")], true).use_color);
        assert!(!auto_with(&[("TERM", "dumb")], true).use_color);
        assert!(auto_with(&[("CLICOLOR_FORCE", "1")], false).use_color);
    }

    #[test]
    fn test_plain_tags() {
        let config = OutputConfig::without_color();
        assert_eq!(config.tag(Status::Run), "[RUN]");
        assert_eq!(config.tag(Status::UpToDate), "[OK]");
        assert_eq!(
            config.line(Status::Failure, "Provisioning failed"),
            "[FAILED] Provisioning failed"
        );
        assert_eq!(config.target_name("all"), "all");
    }

    #[test]
    fn test_emoji_helper_with_color() {
        let config = OutputConfig::with_color();
        assert_eq!(emoji(&config, "🔨", "[RUN]"), "🔨");
        assert_eq!(config.tag(Status::Success), "✅");
    }

    #[test]
    fn test_status_from_action() {
        assert_eq!(Status::from(Action::Run), Status::Run);
        assert_eq!(Status::from(Action::UpToDate), Status::UpToDate);
        assert_eq!(Status::from(Action::Remove), Status::Remove);
        assert_eq!(Status::from(Action::Missing), Status::Failure);
    }
}
