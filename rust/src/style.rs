//! Rendering styles, looked up by key.
//!
//! Every style is a lowercase rendering function plus a case flag. Uppercase
//! output is always the lowercase output with hex letters uppercased.

use crate::guid::{GUID_LEN, Guid};

/// Shape of a rendering, independent of letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
    Default,
    /// `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}`
    Braced,
    /// 32 hex digits, no separators.
    NoHyphen,
    /// C brace initializer in the 4-2-2-8 struct layout.
    Struct,
    /// One struct sub-field, `x0`..`x10`.
    Part(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    Lower,
    Upper,
}

/// A shape together with its letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub shape: Shape,
    pub case: Case,
}

const KEYS: &[(&str, Shape)] = &[
    ("d", Shape::Default),
    ("braced", Shape::Braced),
    ("b", Shape::Braced),
    ("no-hyphen", Shape::NoHyphen),
    ("n", Shape::NoHyphen),
    ("struct", Shape::Struct),
    ("x", Shape::Struct),
];

impl Shape {
    fn render(self, guid: &Guid) -> String {
        match self {
            Self::Default => render_default(guid),
            Self::Braced => format!("{{{}}}", render_default(guid)),
            Self::NoHyphen => hex::encode(guid.as_bytes()),
            Self::Struct => render_struct(guid),
            Self::Part(index) => guid.part(usize::from(index)).unwrap_or_default(),
        }
    }
}

impl Style {
    pub const DEFAULT: Style = Style::lower(Shape::Default);
    pub const BRACED: Style = Style::lower(Shape::Braced);
    pub const NO_HYPHEN: Style = Style::lower(Shape::NoHyphen);
    pub const STRUCT: Style = Style::lower(Shape::Struct);

    pub const fn lower(shape: Shape) -> Self {
        Self {
            shape,
            case: Case::Lower,
        }
    }

    pub const fn upper(self) -> Self {
        Self {
            shape: self.shape,
            case: Case::Upper,
        }
    }

    /// Resolve a style key. Lowercase keys render lowercase; the same key
    /// written in uppercase (`B`, `STRUCT`, `X3`) renders uppercase.
    pub fn parse(key: &str) -> Option<Self> {
        if key.is_empty() {
            return Some(Self::DEFAULT);
        }

        let case = if key.bytes().any(|b| b.is_ascii_lowercase()) {
            Case::Lower
        } else {
            Case::Upper
        };
        if case == Case::Lower && key.bytes().any(|b| b.is_ascii_uppercase()) {
            return None;
        }

        let lowered = key.to_ascii_lowercase();
        let shape = KEYS
            .iter()
            .find(|(k, _)| *k == lowered)
            .map(|(_, shape)| *shape)
            .or_else(|| parse_part(&lowered))?;

        Some(Self { shape, case })
    }

    /// Resolve a style key, falling back to the canonical form.
    pub fn lookup(key: &str) -> Self {
        Self::parse(key).unwrap_or(Self::DEFAULT)
    }

    pub fn render(self, guid: &Guid) -> String {
        let lower = self.shape.render(guid);
        match self.case {
            Case::Lower => lower,
            Case::Upper => upper_hex(&lower),
        }
    }
}

fn parse_part(key: &str) -> Option<Shape> {
    let digits = key.strip_prefix('x')?;
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return None;
    }
    let index: u8 = digits.parse().ok()?;
    Guid::part_range(usize::from(index)).map(|_| Shape::Part(index))
}

fn render_default(guid: &Guid) -> String {
    let b = guid.as_bytes();
    format!(
        "{}-{}-{}-{}-{}",
        hex::encode(&b[0..4]),
        hex::encode(&b[4..6]),
        hex::encode(&b[6..8]),
        hex::encode(&b[8..10]),
        hex::encode(&b[10..GUID_LEN]),
    )
}

fn render_struct(guid: &Guid) -> String {
    let b = guid.as_bytes();
    let tail: Vec<String> = b[8..GUID_LEN]
        .iter()
        .map(|byte| format!("0x{byte:02x}"))
        .collect();
    format!(
        "{{0x{}, 0x{}, 0x{}, {{{}}}}}",
        hex::encode(&b[0..4]),
        hex::encode(&b[4..6]),
        hex::encode(&b[6..8]),
        tail.join(", "),
    )
}

/// Uppercase the hex letters `a`..`f`; leave every other character alone.
fn upper_hex(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'a'..='f' => c.to_ascii_uppercase(),
            _ => c,
        })
        .collect()
}
