//! The closed set of command categories the assistant can act on.
//!
//! Intents come from two producers: the rule-based safety net yields
//! variants directly, and the statistical classifier yields a label
//! string that `from_label` normalizes into the same space.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greet,
    AskName,
    AskIdentity,
    Stop,
    LightOn,
    LightOff,
    FanOn,
    FanOff,
    Time,
    Date,
    Math,
    /// Label the classifier emitted that maps to no known category.
    /// Dispatching it is a no-op.
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greet => "greet",
            Self::AskName => "ask_name",
            Self::AskIdentity => "ask_identity",
            Self::Stop => "stop",
            Self::LightOn => "light_on",
            Self::LightOff => "light_off",
            Self::FanOn => "fan_on",
            Self::FanOff => "fan_off",
            Self::Time => "time",
            Self::Date => "date",
            Self::Math => "math",
            Self::Unknown => "unknown",
        }
    }

    /// Normalize a classifier label into the closed intent space.
    /// Unrecognized labels become `Unknown` rather than an error; the
    /// model is allowed to drift, the dispatch table is not.
    pub fn from_label(label: &str) -> Self {
        match label {
            "greet" => Self::Greet,
            "ask_name" => Self::AskName,
            "ask_identity" => Self::AskIdentity,
            "stop" => Self::Stop,
            "light_on" => Self::LightOn,
            "light_off" => Self::LightOff,
            "fan_on" => Self::FanOn,
            "fan_off" => Self::FanOff,
            "time" => Self::Time,
            "date" => Self::Date,
            "math" => Self::Math,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
