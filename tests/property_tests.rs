//! Property-based tests for fanout_logger using proptest

mod common;

use common::recording_logger;
use fanout_logger::core::format_message;
use fanout_logger::prelude::*;
use proptest::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

fn any_level() -> impl Strategy<Value = LogLevel> {
    (0u8..8).prop_map(|value| LogLevel::try_from(value).unwrap())
}

/// Display argument that counts how often it is rendered
struct CountingDisplay<'a>(&'a AtomicUsize);

impl fmt::Display for CountingDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fetch_add(1, Ordering::SeqCst);
        f.write_str("rendered")
    }
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that LogLevel ordering follows the numeric value
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1.as_u8();
        let val2 = level2.as_u8();

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1.is_enabled_at(level2), val1 <= val2);
    }

    /// Test that parsing accepts case-insensitive input
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let input = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(input.parse::<LogLevel>(), Ok(level));
    }
}

// ============================================================================
// Filtering Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A call reaches the adapters exactly when it is at least as urgent as the minimum level
    #[test]
    fn test_delivery_iff_enabled(level in any_level(), min in any_level()) {
        let (logger, journal) = recording_logger(4);
        logger.set_min_level(min);

        logger.log(level, format_args!("checked")).unwrap();

        let delivered = journal.writes().len();
        if level <= min {
            prop_assert_eq!(delivered, 1);
            prop_assert_eq!(logger.metrics().filtered_count(), 0);
        } else {
            prop_assert_eq!(delivered, 0);
            prop_assert_eq!(logger.metrics().filtered_count(), 1);
        }
    }

    /// Arguments are rendered once for an enabled call and never for a filtered one
    #[test]
    fn test_filtered_call_never_formats(level in any_level(), min in any_level()) {
        let (logger, journal) = recording_logger(4);
        logger.set_min_level(min);
        let renders = AtomicUsize::new(0);

        logger.log(level, format_args!("value {}", CountingDisplay(&renders))).unwrap();

        let expected = if level <= min { 1 } else { 0 };
        prop_assert_eq!(renders.load(Ordering::SeqCst), expected);
        prop_assert_eq!(journal.writes().len(), expected);
    }

    /// Legacy aliases behave exactly like their canonical methods
    #[test]
    fn test_aliases_match_canonical(min in any_level(), message in "[a-zA-Z0-9 ]{0,32}") {
        let (alias_logger, alias_journal) = recording_logger(4);
        let (canonical_logger, canonical_journal) = recording_logger(4);
        alias_logger.set_min_level(min);
        canonical_logger.set_min_level(min);

        alias_logger.warn(format_args!("{}", message)).unwrap();
        alias_logger.info(format_args!("{}", message)).unwrap();
        alias_logger.trace(format_args!("{}", message)).unwrap();

        canonical_logger.warning(format_args!("{}", message)).unwrap();
        canonical_logger.informational(format_args!("{}", message)).unwrap();
        canonical_logger.debug(format_args!("{}", message)).unwrap();

        prop_assert_eq!(alias_journal.writes(), canonical_journal.writes());
    }
}

// ============================================================================
// Formatting Tests
// ============================================================================

proptest! {
    /// Test that the level code and message always end the line
    #[test]
    fn test_format_ends_with_level_and_message(
        level in any_level(),
        tag in "[a-z]{0,8}",
        message in "[^{}]{0,64}",
    ) {
        let text = format_message(level, format_args!("{}", message), &tag, None);
        let suffix = format!("[{}] {}", level.tag(), message);

        prop_assert!(text.ends_with(&suffix));
        prop_assert_eq!(text.starts_with(&format!("[{}] ", tag)), !tag.is_empty());
    }
}
