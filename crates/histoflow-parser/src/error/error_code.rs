//! Error codes for histoflow diagnostics.
//!
//! Codes are organized by phase:
//! - `E1xx` - Line format errors (config format errors)
//! - `E2xx` - Graph construction findings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Line Format Errors (E1xx)
    // =========================================================================
    /// Malformed edge line.
    ///
    /// An edge line must read `Source => Destination/Histogram/Column` with
    /// a non-empty source and exactly three non-empty fields.
    E100,

    // =========================================================================
    // Graph Construction (E2xx)
    // =========================================================================
    /// Stale descendant depth.
    ///
    /// A group's depth was raised after its own children were declared, so
    /// the children keep a depth computed from the shorter path.
    E200,

    /// Column placeholder on a named destination.
    ///
    /// `*` only has meaning on fan-out (`&`) lines; on a named destination
    /// it is stored as a literal column label that no table defines.
    E201,

    /// Fan-out without a histogram.
    ///
    /// A `&` destination inherited (`!`) from a group that has no histogram,
    /// so there are no columns to expand.
    E202,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "malformed edge line",
            ErrorCode::E200 => "stale descendant depth",
            ErrorCode::E201 => "column placeholder on named destination",
            ErrorCode::E202 => "fan-out without histogram",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E202.to_string(), "E202");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E100.description(), "malformed edge line");
        assert_eq!(ErrorCode::E200.description(), "stale descendant depth");
    }
}
