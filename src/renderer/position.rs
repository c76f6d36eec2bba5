//! Line and column extraction from rendering error messages.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches `template: <name>:<line>` with an optional `:<column>`.
    static ref POSITION_RE: Regex = Regex::new(r"template:\s*[^:]+:(\d+)(?::(\d+))?").unwrap();
}

/// Position parsed out of an error message.
///
/// A zero line means the message carried no usable position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPosition {
    pub line: u32,
    pub column: Option<u32>,
}

/// Best-effort scan for a `template: <name>:<line>[:<column>]` marker.
///
/// The engine's message grammar is not contractual, so anything that does
/// not match yields a zero line and no column rather than an error.
pub fn extract_position(message: &str) -> ErrorPosition {
    let Some(caps) = POSITION_RE.captures(message) else {
        return ErrorPosition::default();
    };

    let line = caps[1].parse().unwrap_or(0);
    let column = caps.get(2).and_then(|m| m.as_str().parse().ok());

    ErrorPosition { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column() {
        let position = extract_position("template: body:7:3: function not defined");

        assert_eq!(position, ErrorPosition { line: 7, column: Some(3) });
    }

    #[test]
    fn test_line_without_column() {
        let position = extract_position("template: subject:4: unexpected EOF");

        assert_eq!(position, ErrorPosition { line: 4, column: None });
    }

    #[test]
    fn test_marker_embedded_in_longer_message() {
        let position = extract_position("render failed: template: body:12:40: bad call");

        assert_eq!(position, ErrorPosition { line: 12, column: Some(40) });
    }

    #[test]
    fn test_message_without_marker() {
        assert_eq!(extract_position("something went wrong"), ErrorPosition::default());
        assert_eq!(extract_position(""), ErrorPosition::default());
    }

    #[test]
    fn test_message_with_name_but_no_position() {
        let position = extract_position("template: body: variable not found");

        assert_eq!(position, ErrorPosition { line: 0, column: None });
    }

    #[test]
    fn test_whitespace_between_prefix_and_name() {
        let position = extract_position("template:   weekly digest:3:14: oops");

        assert_eq!(position, ErrorPosition { line: 3, column: Some(14) });
    }
}
