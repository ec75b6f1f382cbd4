//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the config source.
///
/// Primary labels mark the offending line; secondary labels point at related
/// lines, such as the edge that introduced an earlier, shorter path.
///
/// ```text
/// warning[E200]: depth of group `B` raised after its children were declared
///   |
/// 4 | A => B/H2/Total
///   | ^^^^^^^^^^^^^^^ depth raised here
///   |
/// 2 | B => C/H3/Total
///   | --------------- children of `B` declared here
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
