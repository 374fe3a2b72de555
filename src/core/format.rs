//! Message formatting and caller location
//!
//! Produces the final line handed to adapters:
//!
//! ```text
//! [<tag>:<file>:<line>] [<level>] <message>   caller location enabled
//! [<tag>] [<level>] <message>                 tag set
//! [<level>] <message>                         otherwise
//! ```

use super::log_level::LogLevel;
use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::Path;

/// Default caller skip depth: the code that invoked the logging method
pub const DEFAULT_CALLER_SKIP: usize = 2;

/// File name reported when the requested frame cannot be resolved
pub const UNKNOWN_FILE: &str = "???";

/// Source position attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerLocation {
    pub file: &'static str,
    pub line: u32,
}

impl CallerLocation {
    pub const UNKNOWN: CallerLocation = CallerLocation {
        file: UNKNOWN_FILE,
        line: 0,
    };

    fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: basename(location.file()),
            line: location.line(),
        }
    }

    /// Resolve the frame `skip` levels above the formatting code.
    ///
    /// `call_site` is the tracked location of the public logging call.
    /// Depths 0 and 1 point into the logger's own dispatch path. Depth 3 and
    /// above are never tracked and always resolve to [`CallerLocation::UNKNOWN`]
    /// (`???:0`), whatever the call stack looks like.
    pub fn resolve(skip: usize, call_site: &'static Location<'static>) -> Self {
        match skip {
            DEFAULT_CALLER_SKIP => Self::from_location(call_site),
            0 | 1 => Self::from_location(dispatch_frame()),
            _ => Self::UNKNOWN,
        }
    }
}

impl fmt::Display for CallerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

// Not #[track_caller]: reports its own position inside the logger
fn dispatch_frame() -> &'static Location<'static> {
    Location::caller()
}

fn basename(file: &'static str) -> &'static str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

/// Build the final text for one record
pub fn format_message(
    level: LogLevel,
    args: fmt::Arguments<'_>,
    tag: &str,
    caller: Option<CallerLocation>,
) -> String {
    let mut out = String::with_capacity(64);

    // Writing into a String cannot fail
    let _ = match caller {
        Some(location) => write!(out, "[{}:{}] ", tag, location),
        None if !tag.is_empty() => write!(out, "[{}] ", tag),
        None => Ok(()),
    };
    let _ = write!(out, "[{}] {}", level.tag(), args);

    out
}
