//! The insert operation.
//!
//! `Idle -> AwaitingSelection -> (Cancelled | Applying) -> Idle`. With a
//! paste template the selection step is skipped. Every insertion goes
//! through one [`Editor::apply`] call.

use std::future;

use crate::document::{Edit, Editor};
use crate::formats::{PickCandidate, RenderFormat, candidates};
use crate::guid::Guid;
use crate::settings::Settings;

/// Which identifier(s) an insert operation writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    /// One random identifier shared by every selection.
    Single,
    /// A fresh random identifier per selection.
    Multiple,
    /// The empty identifier everywhere.
    Empty,
}

impl GenerateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Empty => "empty",
        }
    }

    fn initial(self) -> Guid {
        match self {
            Self::Empty => Guid::EMPTY,
            Self::Single | Self::Multiple => Guid::generate(),
        }
    }
}

/// Interactive format selection.
pub trait Picker {
    /// Resolve to the index of the chosen candidate, or `None` when the user
    /// dismisses the list.
    fn pick(&mut self, candidates: &[PickCandidate]) -> impl Future<Output = Option<usize>>;
}

impl<F> Picker for F
where
    F: FnMut(&[PickCandidate]) -> Option<usize>,
{
    fn pick(&mut self, candidates: &[PickCandidate]) -> impl Future<Output = Option<usize>> {
        future::ready(self(candidates))
    }
}

/// Result of an insert operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The picker was dismissed; nothing was edited.
    Cancelled,
    Applied {
        insertions: usize,
        /// The inserted text contains a placeholder to rename.
        named: bool,
    },
}

/// Run the insert operation with formats and paste template from `settings`.
pub async fn insert<E, P>(
    editor: &mut E,
    picker: &mut P,
    settings: &Settings,
    mode: GenerateMode,
) -> Result<InsertOutcome, E::Error>
where
    E: Editor,
    P: Picker,
{
    let formats = settings.render_formats();
    insert_with(editor, picker, &formats, settings.paste_template(), mode).await
}

/// Run the insert operation.
///
/// With `paste` set, that template is used for every selection and `picker`
/// is never consulted. Otherwise the candidates for `formats` are offered;
/// a dismissed or out-of-range answer cancels without editing. Editor
/// errors are returned as-is.
pub async fn insert_with<E, P>(
    editor: &mut E,
    picker: &mut P,
    formats: &[RenderFormat],
    paste: Option<&str>,
    mode: GenerateMode,
) -> Result<InsertOutcome, E::Error>
where
    E: Editor,
    P: Picker,
{
    let guid = mode.initial();

    let format = match paste {
        Some(template) => RenderFormat::custom(template),
        None => {
            let items = candidates(&guid, formats);
            match picker.pick(&items).await.and_then(|i| formats.get(i)) {
                Some(format) => format.clone(),
                None => {
                    tracing::debug!(mode = mode.as_str(), "format selection cancelled");
                    return Ok(InsertOutcome::Cancelled);
                }
            }
        }
    };

    let mut current = guid;
    let edits: Vec<Edit> = editor
        .selections()
        .into_iter()
        .enumerate()
        .map(|(i, selection)| {
            if i > 0 && mode == GenerateMode::Multiple {
                current = Guid::generate();
            }
            Edit::new(selection, format.text(&current))
        })
        .collect();

    let insertions = edits.len();
    editor.apply(edits)?;
    tracing::info!(
        insertions,
        mode = mode.as_str(),
        kind = format.kind().as_str(),
        "inserted identifiers"
    );

    Ok(InsertOutcome::Applied {
        insertions,
        named: format.named(),
    })
}
