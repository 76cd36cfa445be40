//! Token substitution for user-supplied format templates.
//!
//! Recognized tokens:
//! - `{x0}`..`{x10}` (`{X0}`..`{X10}` uppercase): struct sub-fields, hex, no `0x`
//! - `{d}` `{b}` `{n}` `{x}` and uppercase `{D}` `{B}` `{N}` `{X}`: default,
//!   braced, no-hyphen and struct renderings
//! - `{nl}`: a line break
//!
//! Every occurrence is replaced. Anything else, including unknown `{...}`
//! tokens, is copied through unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::guid::Guid;
use crate::style::Style;

const NEWLINE_TOKEN: &str = "nl";

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([xX](?:10|[0-9])|nl|[dDbBnNxX])\}").unwrap());

/// Substitute every recognized token in `template` with its rendering of `guid`.
pub fn substitute(guid: &Guid, template: &str) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &Captures| expand(guid, caps))
        .into_owned()
}

/// Whether `template` contains at least one recognized token.
pub fn has_tokens(template: &str) -> bool {
    TOKEN_PATTERN.is_match(template)
}

fn expand(guid: &Guid, caps: &Captures) -> String {
    let token = &caps[1];
    if token == NEWLINE_TOKEN {
        return "\n".to_string();
    }
    Style::parse(token).map_or_else(|| caps[0].to_string(), |style| style.render(guid))
}
