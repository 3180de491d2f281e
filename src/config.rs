//! Register configuration

use serde::{Deserialize, Serialize};

use crate::traits::DEFAULT_MAX_NOTES_LEN;

/// What to do when a shift is opened while another one is still open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenPolicy {
    /// Refuse to open with `ShiftAlreadyOpen`
    #[default]
    Reject,
    /// Force-close the previous shift without a cash count, then open
    AutoClose,
}

impl OpenPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(OpenPolicy::Reject),
            "auto_close" | "auto-close" | "autoclose" => Some(OpenPolicy::AutoClose),
            _ => None,
        }
    }
}

/// Register configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | REGISTER_OPEN_POLICY | reject | `reject` or `auto_close` |
/// | REGISTER_HISTORY_LIMIT | 10 | closed shifts returned by history |
/// | REGISTER_RECENT_LIMIT | 50 | transactions returned by the recent list |
/// | REGISTER_MAX_NOTES_LEN | 500 | longest accepted notes text |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    pub open_policy: OpenPolicy,
    pub history_limit: usize,
    pub recent_transactions_limit: usize,
    pub max_notes_len: usize,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            open_policy: OpenPolicy::Reject,
            history_limit: 10,
            recent_transactions_limit: 50,
            max_notes_len: DEFAULT_MAX_NOTES_LEN,
        }
    }
}

impl RegisterConfig {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, fallback: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(fallback)
        };

        Self {
            open_policy: lookup("REGISTER_OPEN_POLICY")
                .and_then(|v| OpenPolicy::parse(&v))
                .unwrap_or(defaults.open_policy),
            history_limit: number("REGISTER_HISTORY_LIMIT", defaults.history_limit),
            recent_transactions_limit: number(
                "REGISTER_RECENT_LIMIT",
                defaults.recent_transactions_limit,
            ),
            max_notes_len: number("REGISTER_MAX_NOTES_LEN", defaults.max_notes_len),
        }
    }

    pub fn with_open_policy(mut self, open_policy: OpenPolicy) -> Self {
        self.open_policy = open_policy;
        self
    }
}
