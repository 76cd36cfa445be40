//! insert-guid: GUID generation and rendering for editor insertion.
//!
//! A [`Guid`] is a 16-byte value with a lenient, never-failing parser and a
//! family of deterministic renderings. The format layer turns a value into a
//! numbered list of [`PickCandidate`]s, and [`insert`] writes the chosen
//! rendering at every selection of an [`Editor`] in one transaction.
//!
//! # Renderings
//!
//! ```text
//! default   01234567-89ab-cdef-0123-456789abcdef
//! braced    {01234567-89ab-cdef-0123-456789abcdef}
//! no-hyphen 0123456789abcdef0123456789abcdef
//! struct    {0x01234567, 0x89ab, 0xcdef, {0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef}}
//! ```
//!
//! # Example
//!
//! ```
//! use guid::Guid;
//!
//! let g = Guid::parse("{01234567-89AB-CDEF-0123-456789ABCDEF}");
//! assert_eq!(g.format("no-hyphen"), "0123456789abcdef0123456789abcdef");
//! assert_eq!(g.substitute("0x{x0}{nl}"), "0x01234567\n");
//! assert_eq!(Guid::parse("z"), Guid::EMPTY);
//! ```

mod document;
mod formats;
mod guid;
mod insert;
mod settings;
mod style;
mod template;

pub use document::{Edit, EditError, Editor, Selection, TextBuffer};
pub use formats::{
    FormatKind, NAME_PLACEHOLDER, PickCandidate, RenderFormat, Visibility, builtin_formats,
    candidates, quick_pick_items, visible_formats,
};
pub use guid::{GUID_LEN, Guid, PART_COUNT};
pub use insert::{GenerateMode, InsertOutcome, Picker, insert, insert_with};
pub use settings::{NAMESPACE, Settings, SettingsError};
pub use style::{Case, Shape, Style};
pub use template::{has_tokens, substitute};
