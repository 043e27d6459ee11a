//! Polars AnyValue utility functions.

use polars::prelude::*;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts AnyValue to String, keeping the distinction between a missing
/// value (`None`) and an empty or blank one.
pub fn any_to_optional_string(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        other => Some(any_to_string(other)),
    }
}

/// Cell at `idx` of `column`, `None` for nulls and out-of-range rows.
pub fn cell_value(column: &Column, idx: usize) -> Option<String> {
    any_to_optional_string(column.get(idx).unwrap_or(AnyValue::Null))
}

/// Owned column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_distinct_from_empty() {
        assert_eq!(any_to_optional_string(AnyValue::Null), None);
        assert_eq!(
            any_to_optional_string(AnyValue::String("")),
            Some(String::new())
        );
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn cell_value_reads_strings_and_nulls() {
        let column = Column::new("Zip".into(), vec![Some("02139"), None]);
        assert_eq!(cell_value(&column, 0).as_deref(), Some("02139"));
        assert_eq!(cell_value(&column, 1), None);
        assert_eq!(cell_value(&column, 5), None);
    }
}
