//! Source location tracking

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A location in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based, as produced by the parser)
    pub line: usize,
    /// Column number (0-based)
    pub column: usize,
    /// Absolute byte offset
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "line": self.line,
            "column": self.column,
            "offset": self.offset,
        })
    }
}

// Positions are ordered by offset; line and column only break ties so that
// `Ord` stays consistent with `Eq`.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.line.cmp(&other.line))
            .then(self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Start/end pair marking a node's extent.
///
/// Either bound may be unset while the node is being built. Setting one bound
/// never looks at the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Option<Position>,
    pub end: Option<Position>,
}

impl SourceRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both bounds are set
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Both bounds are set and start does not come after end
    pub fn is_ordered(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= end,
            _ => false,
        }
    }

    /// Length in bytes, when the range is complete and ordered
    pub fn len(&self) -> Option<usize> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some(end.offset - start.offset),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Slice of `source` covered by this range
    pub fn source_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        let start = self.start?.offset;
        let end = self.end?.offset;
        source.get(start..end)
    }

    pub fn to_value(&self) -> Value {
        json!({
            "start": self.start.as_ref().map(Position::to_value),
            "end": self.end.as_ref().map(Position::to_value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_offset() {
        let a = Position::new(3, 0, 10);
        let b = Position::new(1, 40, 11);
        assert!(a < b);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn default_range_has_no_bounds() {
        let range = SourceRange::default();
        assert_eq!(range.start, None);
        assert_eq!(range.end, None);
        assert!(!range.is_complete());
        assert!(!range.is_ordered());
        assert_eq!(range.len(), None);
    }

    #[test]
    fn inverted_range_is_complete_but_not_ordered() {
        let range = SourceRange::new(Position::new(1, 5, 5), Position::new(1, 2, 2));
        assert!(range.is_complete());
        assert!(!range.is_ordered());
        assert_eq!(range.len(), None);
    }

    #[test]
    fn source_text_slices_by_offset() {
        let range = SourceRange::new(Position::new(1, 4, 4), Position::new(1, 7, 7));
        assert_eq!(range.source_text("let foo = 1;"), Some("foo"));
        assert_eq!(range.len(), Some(3));
    }

    #[test]
    fn unset_bounds_serialize_as_null() {
        let mut range = SourceRange::default();
        range.end = Some(Position::new(2, 1, 9));
        assert_eq!(
            range.to_value(),
            json!({"start": null, "end": {"line": 2, "column": 1, "offset": 9}})
        );
    }
}
