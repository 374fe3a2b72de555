//! Log level definitions
//!
//! Levels follow RFC 5424: a lower numeric value is more urgent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Informational = 6,
    #[default]
    Debug = 7,
}

impl LogLevel {
    /// Legacy alias for [`LogLevel::Informational`]
    pub const INFO: LogLevel = LogLevel::Informational;
    /// Legacy alias for [`LogLevel::Debug`]
    pub const TRACE: LogLevel = LogLevel::Debug;
    /// Legacy alias for [`LogLevel::Warning`]
    pub const WARN: LogLevel = LogLevel::Warning;

    /// All levels, most urgent first
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Emergency,
        LogLevel::Alert,
        LogLevel::Critical,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Notice,
        LogLevel::Informational,
        LogLevel::Debug,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Emergency => "EMERGENCY",
            LogLevel::Alert => "ALERT",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Notice => "NOTICE",
            LogLevel::Informational => "INFORMATIONAL",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Single-letter code written in front of every message
    pub fn tag(&self) -> char {
        match self {
            LogLevel::Emergency => 'M',
            LogLevel::Alert => 'A',
            LogLevel::Critical => 'C',
            LogLevel::Error => 'E',
            LogLevel::Warning => 'W',
            LogLevel::Notice => 'N',
            LogLevel::Informational => 'I',
            LogLevel::Debug => 'D',
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether a message at this level passes a `min` threshold.
    ///
    /// A message passes when it is at least as urgent as the threshold.
    #[inline]
    pub fn is_enabled_at(self, min: LogLevel) -> bool {
        self <= min
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        LogLevel::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| format!("Invalid log level value: {}", value))
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EMERGENCY" | "EMERG" => Ok(LogLevel::Emergency),
            "ALERT" => Ok(LogLevel::Alert),
            "CRITICAL" | "CRIT" => Ok(LogLevel::Critical),
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "NOTICE" => Ok(LogLevel::Notice),
            "INFORMATIONAL" | "INFO" => Ok(LogLevel::Informational),
            "DEBUG" | "TRACE" => Ok(LogLevel::Debug),
            other => match other.parse::<u8>() {
                Ok(value) => LogLevel::try_from(value),
                Err(_) => Err(format!("Invalid log level: '{}'", s)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_urgency() {
        assert!(LogLevel::Emergency < LogLevel::Alert);
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Informational < LogLevel::Debug);
        assert_eq!(LogLevel::default(), LogLevel::Debug);
    }

    #[test]
    fn test_legacy_aliases() {
        assert_eq!(LogLevel::INFO, LogLevel::Informational);
        assert_eq!(LogLevel::TRACE, LogLevel::Debug);
        assert_eq!(LogLevel::WARN, LogLevel::Warning);
        assert_eq!(LogLevel::WARN.tag(), 'W');
    }

    #[test]
    fn test_is_enabled_at() {
        assert!(LogLevel::Error.is_enabled_at(LogLevel::Warning));
        assert!(LogLevel::Warning.is_enabled_at(LogLevel::Warning));
        assert!(!LogLevel::Notice.is_enabled_at(LogLevel::Warning));
        assert!(LogLevel::Debug.is_enabled_at(LogLevel::Debug));
    }

    #[test]
    fn test_tags() {
        let tags: String = LogLevel::ALL.iter().map(LogLevel::tag).collect();
        assert_eq!(tags, "MACEWNID");
    }

    #[test]
    fn test_parse() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("Info".parse::<LogLevel>(), Ok(LogLevel::Informational));
        assert_eq!("TRACE".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("3".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("8".parse::<LogLevel>().is_err());
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_u8_roundtrip() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::try_from(level.as_u8()), Ok(level));
        }
        assert!(LogLevel::try_from(42).is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"warning\"");

        let level: LogLevel = serde_json::from_str("\"informational\"").unwrap();
        assert_eq!(level, LogLevel::INFO);
    }
}
