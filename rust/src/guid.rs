//! GUID value type: generation, lenient parsing and rendering.
//!
//! Textual grouping: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` (4-2-2-2-6 bytes).
//! Struct grouping: `{0xAAAAAAAA, 0xBBBB, 0xCCCC, {0xDD, ...}}` (4-2-2-8 bytes).
//!
//! Parsing never fails. Every run of two hex digits fills the next byte, and
//! bytes the input does not supply stay zero.

use once_cell::sync::Lazy;
use regex::Regex;
use std::convert::Infallible;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::style::Style;
use crate::template;

/// Payload length in bytes.
pub const GUID_LEN: usize = 16;

/// Number of addressable struct sub-fields (`x0`..`x10`).
pub const PART_COUNT: usize = 11;

static OCTET_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-fA-F]{2}").unwrap());

/// A 128-bit globally unique identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    bytes: [u8; GUID_LEN],
}

impl Guid {
    /// The all-zero identifier.
    pub const EMPTY: Guid = Guid {
        bytes: [0; GUID_LEN],
    };

    /// Generate a random version-4 identifier.
    pub fn generate() -> Self {
        let random: [u8; GUID_LEN] = rand::random();
        Self {
            bytes: uuid::Builder::from_random_bytes(random)
                .into_uuid()
                .into_bytes(),
        }
    }

    /// The all-zero identifier. Same value as `Guid::parse("0")`.
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    pub const fn from_bytes(bytes: [u8; GUID_LEN]) -> Self {
        Self { bytes }
    }

    /// Parse any hex-bearing input, left to right.
    ///
    /// Characters outside two-digit hex runs are skipped without consuming a
    /// byte position. Runs past the sixteenth byte are ignored.
    pub fn parse(input: &str) -> Self {
        let mut bytes = [0u8; GUID_LEN];
        let mut filled = 0;

        for (slot, octet) in bytes.iter_mut().zip(OCTET_PATTERN.find_iter(input)) {
            *slot = u8::from_str_radix(octet.as_str(), 16).unwrap_or_default();
            filled += 1;
        }

        if filled < GUID_LEN {
            tracing::debug!(filled, "zero-filling identifier parsed from short input");
        }

        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; GUID_LEN] {
        &self.bytes
    }

    /// Mutable view of the payload storage.
    ///
    /// This is shared state, not a copy: writes through the returned
    /// reference change every later rendering of this identifier.
    pub fn bytes_mut(&mut self) -> &mut [u8; GUID_LEN] {
        &mut self.bytes
    }

    /// Replace the payload.
    pub fn set_bytes(&mut self, bytes: [u8; GUID_LEN]) {
        self.bytes = bytes;
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == [0; GUID_LEN]
    }

    /// Byte range of struct sub-field `index` (0..=10).
    pub fn part_range(index: usize) -> Option<Range<usize>> {
        match index {
            0 => Some(0..4),
            1 => Some(4..6),
            2 => Some(6..8),
            3..=10 => Some(index + 5..index + 6),
            _ => None,
        }
    }

    /// Lowercase hex of struct sub-field `index`, without a `0x` prefix.
    pub fn part(&self, index: usize) -> Option<String> {
        Self::part_range(index).map(|range| hex::encode(&self.bytes[range]))
    }

    /// Render with a style key (`braced`, `b`, `no-hyphen`, `struct`, `x`,
    /// `x0`..`x10` and their uppercase forms). Unknown keys render the
    /// canonical form.
    pub fn format(&self, style: &str) -> String {
        Style::lookup(style).render(self)
    }

    pub fn render(&self, style: Style) -> String {
        style.render(self)
    }

    /// Replace `{x0}`..`{x10}`, `{nl}` and the short style tokens in
    /// `template`, leaving all other text untouched.
    pub fn substitute(&self, template: &str) -> String {
        template::substitute(self, template)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Style::DEFAULT))
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

impl FromStr for Guid {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<[u8; GUID_LEN]> for Guid {
    fn from(bytes: [u8; GUID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}
