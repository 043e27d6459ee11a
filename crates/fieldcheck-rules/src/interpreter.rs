//! Rule Interpreter
//!
//! Maps one free-text rule description to an executable pattern by testing
//! keyword signatures in a fixed priority order. The first signature found in
//! the text decides the outcome; later matchers are never consulted, even
//! when the chosen one produces no pattern.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use fieldcheck_model::RuleCategory;

use crate::forbidden::forbidden_pattern;

static FIVE_DIGIT_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:five|5)[\s\-]?digit zip").expect("Invalid zip regex"));

static FIVE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b5[\s\-]?digit").expect("Invalid five digit regex"));

static INTERNATIONAL_POSTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)international.*postal code").expect("Invalid postal code regex")
});

static COUNTRY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:2|two)[\s\-]?letter country code").expect("Invalid country code regex")
});

static ZIP_PLUS_FOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)zip\s*\+\s*4|postal code.*5.*4").expect("Invalid ZIP+4 regex")
});

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"yyyy[\-/.]?mm[\-/.]?dd").expect("Invalid date regex"));

/// Result of interpreting one rule text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Pattern source, `None` when the rule is not applicable.
    pub pattern: Option<String>,
    pub category: RuleCategory,
    /// Name of the matcher whose signature was found, if any.
    pub matcher: Option<&'static str>,
}

impl Interpretation {
    fn not_applicable(matcher: Option<&'static str>) -> Self {
        Self {
            pattern: None,
            category: RuleCategory::NotApplicable,
            matcher,
        }
    }
}

/// A keyword signature paired with the pattern it produces.
struct Matcher {
    name: &'static str,
    signature: fn(&str) -> bool,
    /// `None` means the signature matched but nothing can be enforced.
    build: fn(&str) -> Option<(String, RuleCategory)>,
}

/// Priority order; earlier entries win.
static MATCHERS: &[Matcher] = &[
    Matcher {
        name: "whole_dollar_amount",
        signature: is_whole_dollar_amount,
        build: build_whole_dollar_amount,
    },
    Matcher {
        name: "zip_code",
        signature: is_zip_code,
        build: build_zip_code,
    },
    Matcher {
        name: "international_postal_code",
        signature: is_international_postal_code,
        build: build_international_postal_code,
    },
    Matcher {
        name: "numeric_amount",
        signature: is_numeric_amount,
        build: build_numeric_amount,
    },
    Matcher {
        name: "five_digit_code",
        signature: is_five_digit_code,
        build: build_five_digit_code,
    },
    Matcher {
        name: "country_code",
        signature: is_country_code,
        build: build_country_code,
    },
    Matcher {
        name: "zip_plus_four",
        signature: is_zip_plus_four,
        build: build_zip_plus_four,
    },
    Matcher {
        name: "iso_date",
        signature: is_iso_date,
        build: build_iso_date,
    },
    Matcher {
        name: "alphanumeric",
        signature: is_alphanumeric,
        build: build_alphanumeric,
    },
    Matcher {
        name: "forbidden_characters",
        signature: is_forbidden_characters,
        build: build_forbidden_characters,
    },
];

/// Matcher names in evaluation order.
pub fn matcher_names() -> Vec<&'static str> {
    MATCHERS.iter().map(|matcher| matcher.name).collect()
}

/// Interpret a free-text rule description.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Any text
/// is accepted; text with no recognized signature is not applicable.
pub fn interpret(rule_text: &str) -> Interpretation {
    let text = rule_text.trim().to_lowercase();
    let Some(matcher) = MATCHERS.iter().find(|matcher| (matcher.signature)(&text)) else {
        return Interpretation::not_applicable(None);
    };

    let Some((pattern, category)) = (matcher.build)(&text) else {
        debug!(
            matcher = matcher.name,
            "signature matched but no pattern could be derived"
        );
        return Interpretation::not_applicable(Some(matcher.name));
    };

    // Synthesized patterns are checked here so a bad one never reaches validation.
    if let Err(error) = Regex::new(&pattern) {
        warn!(
            matcher = matcher.name,
            pattern = %pattern,
            %error,
            "synthesized pattern is invalid; rule marked not applicable"
        );
        return Interpretation::not_applicable(Some(matcher.name));
    }

    Interpretation {
        pattern: Some(pattern),
        category,
        matcher: Some(matcher.name),
    }
}

fn is_whole_dollar_amount(text: &str) -> bool {
    text.contains("rounded whole dollar amount")
}

fn build_whole_dollar_amount(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^\d+$".to_string(), RuleCategory::WholeDollarAmount))
}

fn is_zip_code(text: &str) -> bool {
    text.contains("zip code") || FIVE_DIGIT_ZIP.is_match(text)
}

fn build_zip_code(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^\d{5}$".to_string(), RuleCategory::UsZipCode))
}

fn is_international_postal_code(text: &str) -> bool {
    INTERNATIONAL_POSTAL.is_match(text)
}

fn build_international_postal_code(_: &str) -> Option<(String, RuleCategory)> {
    Some((
        r"^[A-Za-z0-9\- ]+$".to_string(),
        RuleCategory::InternationalPostalCode,
    ))
}

fn is_numeric_amount(text: &str) -> bool {
    text.contains("must be numeric") || text.contains("amount")
}

/// Sub-signatures are checked in order: positive, no decimals, negative.
fn build_numeric_amount(text: &str) -> Option<(String, RuleCategory)> {
    let built = if text.contains("must be positive") {
        (r"^\d+(?:\.\d{1,2})?$", RuleCategory::PositiveAmount)
    } else if text.contains("no decimals") {
        (r"^\d+$", RuleCategory::WholeNumber)
    } else if text.contains("can be negative") {
        (r"^-?\d+(?:\.\d{1,2})?$", RuleCategory::SignedAmount)
    } else {
        (r"^\d+(?:\.\d{1,2})?$", RuleCategory::NumericAmount)
    };
    Some((built.0.to_string(), built.1))
}

fn is_five_digit_code(text: &str) -> bool {
    FIVE_DIGITS.is_match(text)
}

fn build_five_digit_code(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^\d{5}$".to_string(), RuleCategory::FiveDigitCode))
}

fn is_country_code(text: &str) -> bool {
    COUNTRY_CODE.is_match(text)
}

fn build_country_code(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^[A-Z]{2}$".to_string(), RuleCategory::CountryCode))
}

fn is_zip_plus_four(text: &str) -> bool {
    ZIP_PLUS_FOUR.is_match(text)
}

fn build_zip_plus_four(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^\d{5}-\d{4}$".to_string(), RuleCategory::ZipPlusFour))
}

fn is_iso_date(text: &str) -> bool {
    ISO_DATE.is_match(text)
}

fn build_iso_date(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^\d{4}-\d{2}-\d{2}$".to_string(), RuleCategory::IsoDate))
}

fn is_alphanumeric(text: &str) -> bool {
    text.contains("alphanumeric")
}

fn build_alphanumeric(_: &str) -> Option<(String, RuleCategory)> {
    Some((r"^[A-Za-z0-9]+$".to_string(), RuleCategory::Alphanumeric))
}

fn is_forbidden_characters(text: &str) -> bool {
    text.contains("must not contain")
}

fn build_forbidden_characters(text: &str) -> Option<(String, RuleCategory)> {
    forbidden_pattern(text).map(|pattern| (pattern, RuleCategory::ForbiddenCharacters))
}
