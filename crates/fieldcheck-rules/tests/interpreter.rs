//! Properties of the rule interpreter.

use fieldcheck_model::RuleCategory;
use fieldcheck_rules::interpret;
use proptest::prelude::*;
use proptest::test_runner::Config;
use regex::Regex;

fn compiled(text: &str) -> Regex {
    let interpretation = interpret(text);
    let pattern = interpretation
        .pattern
        .unwrap_or_else(|| panic!("no pattern for {text:?}"));
    Regex::new(&pattern).expect("interpreted pattern compiles")
}

#[test]
fn positive_amount_rejects_signs_and_extra_decimals() {
    let interpretation = interpret("Amount must be positive");
    assert_eq!(interpretation.category, RuleCategory::PositiveAmount);

    let regex = compiled("Amount must be positive");
    for accepted in ["0", "5", "12.3", "100.25"] {
        assert!(regex.is_match(accepted), "{accepted}");
    }
    for rejected in ["-5", "+5", "1.234", "", "abc", "1."] {
        assert!(!regex.is_match(rejected), "{rejected}");
    }
}

#[test]
fn numeric_sub_rules_follow_priority() {
    assert_eq!(
        interpret("Amount must be positive, no decimals").category,
        RuleCategory::PositiveAmount
    );
    assert_eq!(
        interpret("Must be numeric, no decimals").category,
        RuleCategory::WholeNumber
    );
    assert_eq!(
        interpret("Amount can be negative").category,
        RuleCategory::SignedAmount
    );
    assert_eq!(
        interpret("Total amount").category,
        RuleCategory::NumericAmount
    );
}

#[test]
fn zip_code_takes_priority_over_amount() {
    let interpretation = interpret("Zip code for the billing amount");
    assert_eq!(interpretation.category, RuleCategory::UsZipCode);
    assert_eq!(interpretation.pattern.as_deref(), Some(r"^\d{5}$"));
}

#[test]
fn whole_dollar_amount_beats_numeric_amount() {
    let interpretation = interpret("Rounded whole dollar amount");
    assert_eq!(interpretation.category, RuleCategory::WholeDollarAmount);
    assert_eq!(interpretation.pattern.as_deref(), Some(r"^\d+$"));
}

#[test]
fn remaining_matchers() {
    let cases = [
        ("Five-digit ZIP", RuleCategory::UsZipCode),
        (
            "International addresses use the local postal code",
            RuleCategory::InternationalPostalCode,
        ),
        ("Two letter country code", RuleCategory::CountryCode),
        ("Must be 5 digits", RuleCategory::FiveDigitCode),
        ("Postal code of 5 then 4 digits", RuleCategory::ZipPlusFour),
        // "5 digits" is seen before the ZIP+4 signature.
        ("Postal code with 5 digits and 4 digit suffix", RuleCategory::FiveDigitCode),
        ("Formatted as YYYY/MM/DD", RuleCategory::IsoDate),
        ("Alphanumeric identifier", RuleCategory::Alphanumeric),
        ("Must not contain a pipe", RuleCategory::ForbiddenCharacters),
        ("Free text", RuleCategory::NotApplicable),
    ];
    for (text, expected) in cases {
        assert_eq!(interpret(text).category, expected, "{text}");
    }
}

#[test]
fn country_code_is_upper_case_only() {
    let regex = compiled("2-letter country code");
    assert!(regex.is_match("US"));
    assert!(!regex.is_match("us"));
    assert!(!regex.is_match("USA"));
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn zip_code_signature_always_wins(
        prefix in "[a-q ]{0,20}",
        suffix in "[a-q ]{0,20}",
    ) {
        let text = format!("{prefix} zip code {suffix} amount must be positive");
        let interpretation = interpret(&text);
        prop_assert_eq!(interpretation.category, RuleCategory::UsZipCode);
        prop_assert_eq!(interpretation.pattern.as_deref(), Some(r"^\d{5}$"));
    }

    #[test]
    fn zip_pattern_accepts_exactly_five_digits(value in "[0-9]{1,9}") {
        let regex = compiled("5 digit zip code");
        prop_assert_eq!(regex.is_match(&value), value.len() == 5);
    }

    #[test]
    fn positive_amount_accepts_plain_decimals(
        whole in 0_u32..1_000_000,
        cents in proptest::option::of("[0-9]{1,2}"),
    ) {
        let regex = compiled("Amount must be positive");
        let value = match cents {
            Some(cents) => format!("{whole}.{cents}"),
            None => whole.to_string(),
        };
        prop_assert!(regex.is_match(&value));
        let negative = format!("-{value}");
        prop_assert!(!regex.is_match(&negative));
    }

    #[test]
    fn forbidden_comma_and_carriage_return(
        head in "[a-z0-9 ]{0,12}",
        tail in "[a-z0-9 ]{0,12}",
        bad in prop_oneof![Just(','), Just('\r')],
    ) {
        let regex = compiled("Must not contain commas or carriage returns");
        let clean = format!("{head}{tail}");
        prop_assert!(regex.is_match(&clean));
        let dirty = format!("{head}{bad}{tail}");
        prop_assert!(!regex.is_match(&dirty));
    }
}
