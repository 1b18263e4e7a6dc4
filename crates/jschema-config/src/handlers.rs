//! Built-in handler toggles.

use serde::{Deserialize, Serialize};

const fn enabled() -> bool {
    true
}

/// Which built-in type handlers a registry installs on construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Map `chrono::DateTime<Utc>` to a `date-time` string.
    #[serde(default = "enabled")]
    pub timestamp: bool,

    /// Map `chrono::NaiveDate` to a `date` string.
    #[serde(default = "enabled")]
    pub date: bool,

    /// Map `num_bigint::BigInt` to a `number`.
    #[serde(default = "enabled")]
    pub big_int: bool,

    /// Map `serde_json::Value` to an untyped named definition instead of `{type: object}`.
    #[serde(default)]
    pub raw_json: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            timestamp: enabled(),
            date: enabled(),
            big_int: enabled(),
            raw_json: false,
        }
    }
}
