//! Error and diagnostic system for the histoflow parser.
//!
//! Problems are reported as [`Diagnostic`]s: a severity, an optional
//! [`ErrorCode`], labelled spans of the config source and help text.
//! Errors are returned together in a [`ParseError`]; warnings ride along
//! with a successful parse.
//!
//! # Example
//!
//! ```
//! # use histoflow_parser::error::{Diagnostic, ErrorCode};
//! # use histoflow_parser::Span;
//!
//! let diag = Diagnostic::error("malformed edge line `Root => A/H1`")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(14..26), "expected 3 `/`-separated fields, found 2")
//!     .with_help("write edges as `Source => Destination/Histogram/Column`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
