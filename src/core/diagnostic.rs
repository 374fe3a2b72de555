//! Fallback diagnostic output
//!
//! The logger cannot report its own failures through its adapters, so
//! failures are described on a separate sink. The default sink writes to
//! stderr.

use std::sync::Arc;

/// Receiver for one-line diagnostic messages
pub type DiagnosticSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Sink that prints each diagnostic to stderr
pub fn stderr_sink() -> DiagnosticSink {
    Arc::new(|line: &str| eprintln!("[LOGGER ERROR] {}", line))
}

/// Sink that discards diagnostics
pub fn silent_sink() -> DiagnosticSink {
    Arc::new(|_: &str| {})
}

/// Extract a printable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_custom_sink_receives_lines() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);
        let sink: DiagnosticSink = Arc::new(move |line| lines_clone.lock().push(line.to_string()));

        sink("adapter 'file' failed");
        sink("second");

        assert_eq!(*lines.lock(), vec!["adapter 'file' failed", "second"]);
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "code 7");
    }
}
