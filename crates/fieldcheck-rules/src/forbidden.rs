//! Forbidden-character rules.
//!
//! A "must not contain" rule names the characters it excludes in prose. Each
//! recognized token adds members to a [`ForbiddenSet`], which renders as a
//! negated character class over the whole value.

use std::sync::LazyLock;

use regex::Regex;

/// Recognized tokens; class emission order is fixed by [`ForbiddenSet::class_body`].
static TOKENS: LazyLock<Vec<(Regex, ForbiddenMember)>> = LazyLock::new(|| {
    [
        (r"\bcommas?\b", ForbiddenMember::Comma),
        (r"\bcarriage[\s\-]?returns?\b", ForbiddenMember::CarriageReturn),
        (r"\b(?:line[\s\-]?feeds?|new[\s\-]?lines?)\b", ForbiddenMember::LineFeed),
        (r"\btabs?\b", ForbiddenMember::Tab),
        (r"\bsemicolons?\b", ForbiddenMember::Semicolon),
        (r"\bpipes?\b", ForbiddenMember::Pipe),
        (
            r"\b(?:double[\s\-]?quotes?|quotation[\s\-]?marks?)\b",
            ForbiddenMember::DoubleQuote,
        ),
        (
            r"\b(?:unprintable|non[\s\-]?printable|control[\s\-]?characters?)\b",
            ForbiddenMember::Control,
        ),
        (r"\b(?:hyphens?|dash(?:es)?)\b", ForbiddenMember::Hyphen),
    ]
    .into_iter()
    .map(|(source, member)| {
        (
            Regex::new(source).expect("Invalid forbidden token regex"),
            member,
        )
    })
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForbiddenMember {
    Comma,
    CarriageReturn,
    LineFeed,
    Tab,
    Semicolon,
    Pipe,
    DoubleQuote,
    Control,
    Hyphen,
}

/// Characters a field must not contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForbiddenSet {
    pub comma: bool,
    pub carriage_return: bool,
    pub line_feed: bool,
    pub tab: bool,
    pub semicolon: bool,
    pub pipe: bool,
    pub double_quote: bool,
    /// C0 controls plus DEL.
    pub control: bool,
    pub hyphen: bool,
}

impl ForbiddenSet {
    /// Collect every recognized token in `text`.
    pub fn from_text(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let mut set = Self::default();
        for (regex, member) in TOKENS.iter() {
            if regex.is_match(&lowered) {
                set.insert(*member);
            }
        }
        set
    }

    fn insert(&mut self, member: ForbiddenMember) {
        match member {
            ForbiddenMember::Comma => self.comma = true,
            ForbiddenMember::CarriageReturn => self.carriage_return = true,
            ForbiddenMember::LineFeed => self.line_feed = true,
            ForbiddenMember::Tab => self.tab = true,
            ForbiddenMember::Semicolon => self.semicolon = true,
            ForbiddenMember::Pipe => self.pipe = true,
            ForbiddenMember::DoubleQuote => self.double_quote = true,
            ForbiddenMember::Control => self.control = true,
            ForbiddenMember::Hyphen => self.hyphen = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Body of the negated class, without brackets.
    pub fn class_body(&self) -> String {
        let mut body = String::new();
        let members = [
            (self.comma, ","),
            (self.carriage_return, r"\r"),
            (self.line_feed, r"\n"),
            (self.tab, r"\t"),
            (self.semicolon, ";"),
            (self.pipe, r"\|"),
            (self.double_quote, "\""),
            (self.control, r"\x00-\x1F\x7F"),
        ];
        for (enabled, item) in members {
            if enabled {
                body.push_str(item);
            }
        }
        // Last, so it can never form a range with a neighbour.
        if self.hyphen {
            body.push_str(r"\-");
        }
        body
    }

    /// Full-value pattern, `None` when nothing is forbidden.
    pub fn to_pattern(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("^[^{}]*$", self.class_body()))
    }
}

/// Pattern rejecting every character named in `text`.
pub fn forbidden_pattern(text: &str) -> Option<String> {
    ForbiddenSet::from_text(text).to_pattern()
}
