//! Format table and pick candidates.
//!
//! A [`RenderFormat`] turns a [`Guid`] into insertion text through a
//! template. Built-in formats are grouped in three categories shown in a
//! fixed order: lowercase, uppercase, snippets. Configured template strings
//! become custom formats.

use serde::Serialize;
use std::borrow::Cow;

use crate::guid::Guid;
use crate::template;

macro_rules! name_placeholder {
    () => {
        "__NAME__"
    };
}

/// Placeholder the user renames after inserting a snippet. Selects fully on
/// double click.
pub const NAME_PLACEHOLDER: &str = name_placeholder!();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Lowercase,
    Uppercase,
    Snippet,
    Custom,
}

impl FormatKind {
    /// Category order of built-in formats.
    pub const ORDER: [FormatKind; 3] = [Self::Lowercase, Self::Uppercase, Self::Snippet];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::Snippet => "snippet",
            Self::Custom => "custom",
        }
    }
}

/// Line written above commented snippets.
const COMMENT_LINE: &str = "// {b}{nl}";

/// A rendering rule: a template (see [`crate::template`]) and its category.
#[derive(Debug, Clone)]
pub struct RenderFormat {
    body: Cow<'static, str>,
    kind: FormatKind,
    commented: bool,
}

impl RenderFormat {
    const fn builtin(kind: FormatKind, body: &'static str) -> Self {
        Self {
            body: Cow::Borrowed(body),
            kind,
            commented: false,
        }
    }

    /// Snippet with a `// {braced}` comment line before it and a trailing
    /// line break.
    const fn commented(body: &'static str) -> Self {
        Self {
            body: Cow::Borrowed(body),
            kind: FormatKind::Snippet,
            commented: true,
        }
    }

    /// A format driven by a user template.
    pub fn custom(template: impl Into<String>) -> Self {
        Self {
            body: Cow::Owned(template.into()),
            kind: FormatKind::Custom,
            commented: false,
        }
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// Whether the rendering contains [`NAME_PLACEHOLDER`].
    pub fn named(&self) -> bool {
        self.body.contains(NAME_PLACEHOLDER)
    }

    /// Template string that reproduces [`RenderFormat::text`] through
    /// substitution. Used to seed the `formats` setting.
    pub fn seed_template(&self) -> Cow<'_, str> {
        if self.commented {
            Cow::Owned(format!("{COMMENT_LINE}{}{{nl}}", self.body))
        } else {
            Cow::Borrowed(self.body.as_ref())
        }
    }

    /// One-line preview of the rendering, without comment line or trailing
    /// line break.
    pub fn describe(&self, guid: &Guid) -> String {
        one_line(&template::substitute(guid, &self.body))
    }

    /// Full insertion text.
    pub fn text(&self, guid: &Guid) -> String {
        let body = template::substitute(guid, &self.body);
        if self.commented {
            format!("{}{body}\n", template::substitute(guid, COMMENT_LINE))
        } else {
            body
        }
    }
}

fn one_line(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

static BUILTIN_FORMATS: [RenderFormat; 10] = [
    RenderFormat::builtin(FormatKind::Lowercase, "{d}"),
    RenderFormat::builtin(FormatKind::Lowercase, "{b}"),
    RenderFormat::builtin(FormatKind::Lowercase, "{n}"),
    RenderFormat::builtin(FormatKind::Uppercase, "{D}"),
    RenderFormat::builtin(FormatKind::Uppercase, "{B}"),
    RenderFormat::builtin(FormatKind::Uppercase, "{N}"),
    RenderFormat::commented(concat!(
        "static const struct GUID ",
        name_placeholder!(),
        " = {x};"
    )),
    RenderFormat::commented(concat!(
        "DEFINE_GUID(",
        name_placeholder!(),
        ", 0x{x0}, 0x{x1}, 0x{x2}, 0x{x3}, 0x{x4}, 0x{x5}, 0x{x6}, 0x{x7}, 0x{x8}, 0x{x9}, 0x{x10});"
    )),
    RenderFormat::builtin(FormatKind::Snippet, "{x}"),
    RenderFormat::commented(concat!(
        "const ",
        name_placeholder!(),
        ": GUID = GUID::from_values(0x{x0}, 0x{x1}, 0x{x2}, [0x{x3}, 0x{x4}, 0x{x5}, 0x{x6}, 0x{x7}, 0x{x8}, 0x{x9}, 0x{x10}]);"
    )),
];

/// Every built-in format, in category order.
pub fn builtin_formats() -> &'static [RenderFormat] {
    &BUILTIN_FORMATS
}

/// Which built-in categories to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub lowercase: bool,
    pub uppercase: bool,
    pub snippets: bool,
}

impl Visibility {
    pub const ALL: Visibility = Visibility {
        lowercase: true,
        uppercase: true,
        snippets: true,
    };

    /// Whether `kind` is offered. With every flag off, lowercase is offered
    /// anyway so the list is never empty.
    pub fn shows(self, kind: FormatKind) -> bool {
        match kind {
            FormatKind::Lowercase => self.lowercase || (!self.uppercase && !self.snippets),
            FormatKind::Uppercase => self.uppercase,
            FormatKind::Snippet => self.snippets,
            FormatKind::Custom => false,
        }
    }
}

/// Built-in formats offered under `visibility`, category by category.
pub fn visible_formats(visibility: Visibility) -> Vec<RenderFormat> {
    FormatKind::ORDER
        .iter()
        .filter(|kind| visibility.shows(**kind))
        .flat_map(|kind| builtin_formats().iter().filter(move |f| f.kind == *kind))
        .cloned()
        .collect()
}

/// One entry of the picker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickCandidate {
    /// 1-based position in the list.
    pub label: String,
    pub description: String,
    pub text: String,
    pub named: bool,
}

impl PickCandidate {
    pub fn new(index: usize, guid: &Guid, format: &RenderFormat) -> Self {
        Self {
            label: index.to_string(),
            description: format.describe(guid),
            text: format.text(guid),
            named: format.named(),
        }
    }
}

/// Render every format for `guid`, labelled `1..=N` in list order.
pub fn candidates(guid: &Guid, formats: &[RenderFormat]) -> Vec<PickCandidate> {
    formats
        .iter()
        .enumerate()
        .map(|(i, format)| PickCandidate::new(i + 1, guid, format))
        .collect()
}

/// Candidates for the built-in formats offered under `visibility`.
pub fn quick_pick_items(guid: &Guid, visibility: Visibility) -> Vec<PickCandidate> {
    candidates(guid, &visible_formats(visibility))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: Visibility = Visibility {
        lowercase: true,
        uppercase: false,
        snippets: true,
    };

    fn sample() -> Guid {
        Guid::parse("12341234-dead-beef-1234-123412341234")
    }

    fn labels(items: &[PickCandidate]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn test_default_items() {
        let g = Guid::parse("12341234-1234-1234-1234-123412341234");
        let items = quick_pick_items(&g, DEFAULTS);
        assert_eq!(items.len(), 7);
        assert_eq!(labels(&items), ["1", "2", "3", "4", "5", "6", "7"]);

        assert_eq!(items[0].description, "12341234-1234-1234-1234-123412341234");
        assert_eq!(items[0].text, "12341234-1234-1234-1234-123412341234");
        assert_eq!(items[1].text, "{12341234-1234-1234-1234-123412341234}");
        assert_eq!(items[2].text, "12341234123412341234123412341234");
        assert!(!items[0].named);
    }

    #[test]
    fn test_c_struct_snippet() {
        let items = quick_pick_items(&sample(), DEFAULTS);
        let item = &items[3];
        assert_eq!(item.label, "4");
        assert_eq!(
            item.description,
            "static const struct GUID __NAME__ = {0x12341234, 0xdead, 0xbeef, {0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34}};"
        );
        assert_eq!(
            item.text,
            "// {12341234-dead-beef-1234-123412341234}\n\
             static const struct GUID __NAME__ = {0x12341234, 0xdead, 0xbeef, {0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34}};\n"
        );
        assert!(item.named);
    }

    #[test]
    fn test_c_macro_snippet() {
        let items = quick_pick_items(&sample(), DEFAULTS);
        let item = &items[4];
        assert_eq!(
            item.description,
            "DEFINE_GUID(__NAME__, 0x12341234, 0xdead, 0xbeef, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34);"
        );
        assert_eq!(
            item.text,
            "// {12341234-dead-beef-1234-123412341234}\n\
             DEFINE_GUID(__NAME__, 0x12341234, 0xdead, 0xbeef, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34);\n"
        );
    }

    #[test]
    fn test_struct_and_rust_snippets() {
        let items = quick_pick_items(&sample(), DEFAULTS);
        assert_eq!(
            items[5].text,
            "{0x12341234, 0xdead, 0xbeef, {0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34}}"
        );
        assert!(!items[5].named);
        assert_eq!(
            items[6].description,
            "const __NAME__: GUID = GUID::from_values(0x12341234, 0xdead, 0xbeef, [0x12, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x34]);"
        );
        assert!(items[6].text.starts_with("// {12341234-dead-beef-1234-123412341234}\n"));
        assert!(items[6].text.ends_with(");\n"));
    }

    #[test]
    fn test_all_categories_in_order() {
        let items = quick_pick_items(&sample(), Visibility::ALL);
        let count = |kind: FormatKind| builtin_formats().iter().filter(|f| f.kind() == kind).count();
        assert_eq!(
            items.len(),
            count(FormatKind::Lowercase) + count(FormatKind::Uppercase) + count(FormatKind::Snippet)
        );
        let expected: Vec<String> = (1..=items.len()).map(|i| i.to_string()).collect();
        assert_eq!(labels(&items), expected);

        assert_eq!(items[2].text, "12341234deadbeef1234123412341234");
        assert_eq!(items[3].text, "12341234-DEAD-BEEF-1234-123412341234");
        assert_eq!(items[4].text, "{12341234-DEAD-BEEF-1234-123412341234}");
        assert_eq!(items[5].text, "12341234DEADBEEF1234123412341234");
        assert!(items[6].named);
    }

    #[test]
    fn test_only_uppercase() {
        let visibility = Visibility {
            lowercase: false,
            uppercase: true,
            snippets: false,
        };
        let items = quick_pick_items(&sample(), visibility);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].label, "1");
        assert_eq!(items[0].text, "12341234-DEAD-BEEF-1234-123412341234");
    }

    #[test]
    fn test_only_snippets_relabels_from_one() {
        let visibility = Visibility {
            lowercase: false,
            uppercase: false,
            snippets: true,
        };
        let items = quick_pick_items(&sample(), visibility);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].label, "1");
        assert!(items[0].text.contains("static const struct GUID"));
    }

    #[test]
    fn test_nothing_enabled_falls_back_to_lowercase() {
        let none = Visibility {
            lowercase: false,
            uppercase: false,
            snippets: false,
        };
        let only_lower = Visibility {
            lowercase: true,
            uppercase: false,
            snippets: false,
        };
        let items = quick_pick_items(&sample(), none);
        assert!(!items.is_empty());
        assert_eq!(items, quick_pick_items(&sample(), only_lower));
    }

    #[test]
    fn test_seed_templates_reproduce_builtins() {
        let g = sample();
        for format in builtin_formats() {
            assert_eq!(g.substitute(&format.seed_template()), format.text(&g));
            let custom = RenderFormat::custom(format.seed_template());
            assert_eq!(custom.named(), format.named());
        }
    }

    #[test]
    fn test_named_snippets_share_placeholder() {
        let named: Vec<&RenderFormat> = builtin_formats().iter().filter(|f| f.named()).collect();
        assert_eq!(named.len(), 3);
        for format in named {
            assert_eq!(format.kind(), FormatKind::Snippet);
            assert!(format.seed_template().starts_with(COMMENT_LINE));
            assert!(format.describe(&Guid::EMPTY).contains(NAME_PLACEHOLDER));
        }
    }

    #[test]
    fn test_custom_format() {
        let g = sample();
        let format = RenderFormat::custom("// {B}{nl}let __NAME__ = \"{d}\";\n");
        assert_eq!(format.kind(), FormatKind::Custom);
        assert!(format.named());
        assert_eq!(
            format.text(&g),
            "// {12341234-DEAD-BEEF-1234-123412341234}\nlet __NAME__ = \"12341234-dead-beef-1234-123412341234\";\n"
        );
        assert_eq!(
            format.describe(&g),
            "// {12341234-DEAD-BEEF-1234-123412341234} let __NAME__ = \"12341234-dead-beef-1234-123412341234\";"
        );
    }
}
