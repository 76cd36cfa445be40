//! Host editor seam.
//!
//! An [`Editor`] exposes its cursor/selection set and applies a group of
//! edits as one transaction. [`TextBuffer`] is the in-memory implementation
//! used by the CLI.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A byte range in the document. Empty means a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Selection between two offsets, in either order.
    pub fn new(anchor: usize, active: usize) -> Self {
        Self {
            start: anchor.min(active),
            end: anchor.max(active),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

impl FromStr for Selection {
    type Err = String;

    /// `OFFSET` for a caret, `START..END` for a range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let offset = |v: &str| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid offset: {v}"))
        };
        match s.split_once("..") {
            Some((start, end)) => Ok(Self::new(offset(start)?, offset(end)?)),
            None => Ok(Self::caret(offset(s)?)),
        }
    }
}

/// Replace `selection` with `text`; an empty selection inserts at its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub selection: Selection,
    pub text: String,
}

impl Edit {
    pub fn new(selection: Selection, text: impl Into<String>) -> Self {
        Self {
            selection,
            text: text.into(),
        }
    }
}

/// A document that can be edited at its selections.
pub trait Editor {
    type Error;

    /// Current cursors and selections, in the host's order.
    fn selections(&self) -> Vec<Selection>;

    /// Apply every edit or none of them.
    fn apply(&mut self, edits: Vec<Edit>) -> Result<(), Self::Error>;
}

/// Errors raised by [`TextBuffer::apply`]. A failed apply leaves the buffer
/// untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("selection {selection} is outside the document ({len} bytes)")]
    OutOfBounds { selection: Selection, len: usize },
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
    #[error("selections {0} and {1} overlap")]
    Overlapping(Selection, Selection),
}

/// In-memory text document with a selection set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    selections: Vec<Selection>,
}

impl TextBuffer {
    /// Buffer with a single caret at the end of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selections: vec![Selection::caret(end)],
        }
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    fn validate(&self, edits: &[Edit]) -> Result<Vec<usize>, EditError> {
        let len = self.text.len();
        for edit in edits {
            let selection = edit.selection;
            if selection.end > len {
                return Err(EditError::OutOfBounds { selection, len });
            }
            for offset in [selection.start, selection.end] {
                if !self.text.is_char_boundary(offset) {
                    return Err(EditError::NotCharBoundary(offset));
                }
            }
        }

        // Carets sort before ranges sharing their start; equal selections
        // stay in host order.
        let mut order: Vec<usize> = (0..edits.len()).collect();
        order.sort_by_key(|&i| (edits[i].selection.start, edits[i].selection.end));
        for pair in order.windows(2) {
            let (a, b) = (edits[pair[0]].selection, edits[pair[1]].selection);
            if a.end > b.start {
                return Err(EditError::Overlapping(a, b));
            }
        }
        Ok(order)
    }
}

impl Editor for TextBuffer {
    type Error = EditError;

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn apply(&mut self, edits: Vec<Edit>) -> Result<(), EditError> {
        let order = self.validate(&edits)?;

        // Back to front so earlier offsets stay valid.
        for &i in order.iter().rev() {
            let edit = &edits[i];
            self.text
                .replace_range(edit.selection.start..edit.selection.end, &edit.text);
        }

        // Carets land after each inserted text.
        let (mut added, mut removed) = (0, 0);
        self.selections = order
            .iter()
            .map(|&i| {
                let Edit { selection, text } = &edits[i];
                let end = selection.start - removed + added + text.len();
                added += text.len();
                removed += selection.end - selection.start;
                Selection::caret(end)
            })
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_str() {
        assert_eq!("7".parse::<Selection>().unwrap(), Selection::caret(7));
        assert_eq!("9..3".parse::<Selection>().unwrap(), Selection::new(3, 9));
        assert!("a..3".parse::<Selection>().is_err());
        assert!("".parse::<Selection>().is_err());
    }

    #[test]
    fn test_insert_and_replace() {
        let mut buffer = TextBuffer::new("let a = X; let b = ;")
            .with_selections(vec![Selection::new(8, 9), Selection::caret(19)]);
        buffer
            .apply(vec![
                Edit::new(Selection::new(8, 9), "1"),
                Edit::new(Selection::caret(19), "22"),
            ])
            .unwrap();
        assert_eq!(buffer.text(), "let a = 1; let b = 22;");
        assert_eq!(
            buffer.selections(),
            vec![Selection::caret(9), Selection::caret(21)]
        );
    }

    #[test]
    fn test_edits_out_of_order() {
        let mut buffer = TextBuffer::new("ac");
        buffer
            .apply(vec![
                Edit::new(Selection::caret(2), "d"),
                Edit::new(Selection::caret(1), "b"),
            ])
            .unwrap();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_carets_at_same_offset_keep_order() {
        let mut buffer = TextBuffer::new("[]");
        buffer
            .apply(vec![
                Edit::new(Selection::caret(1), "x"),
                Edit::new(Selection::caret(1), "y"),
            ])
            .unwrap();
        assert_eq!(buffer.text(), "[xy]");
    }

    #[test]
    fn test_caret_at_range_start_in_either_order() {
        let caret = Edit::new(Selection::caret(1), "<");
        let range = Edit::new(Selection::new(1, 3), "X");

        let mut forward = TextBuffer::new("abcd");
        forward.apply(vec![caret.clone(), range.clone()]).unwrap();
        let mut backward = TextBuffer::new("abcd");
        backward.apply(vec![range, caret]).unwrap();

        assert_eq!(forward.text(), "a<Xd");
        assert_eq!(backward.text(), forward.text());
    }

    #[test]
    fn test_ranges_sharing_start_overlap_in_either_order() {
        let short = Edit::new(Selection::new(1, 2), "x");
        let long = Edit::new(Selection::new(1, 3), "y");
        let mut buffer = TextBuffer::new("abcd");
        assert!(matches!(
            buffer.apply(vec![short.clone(), long.clone()]),
            Err(EditError::Overlapping(_, _))
        ));
        assert!(matches!(
            buffer.apply(vec![long, short]),
            Err(EditError::Overlapping(_, _))
        ));
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_failed_apply_changes_nothing() {
        let mut buffer = TextBuffer::new("héllo");
        let before = buffer.clone();

        assert_eq!(
            buffer.apply(vec![
                Edit::new(Selection::caret(0), "ok"),
                Edit::new(Selection::caret(9), "x"),
            ]),
            Err(EditError::OutOfBounds {
                selection: Selection::caret(9),
                len: 6
            })
        );
        assert_eq!(
            buffer.apply(vec![Edit::new(Selection::caret(2), "x")]),
            Err(EditError::NotCharBoundary(2))
        );
        assert!(matches!(
            buffer.apply(vec![
                Edit::new(Selection::new(0, 3), "x"),
                Edit::new(Selection::new(1, 4), "y"),
            ]),
            Err(EditError::Overlapping(_, _))
        ));
        assert_eq!(buffer, before);
    }
}
