//! Rulebook loading.
//!
//! A rulebook is the tabular extract of a data dictionary: one
//! record per field with its description and allowable values. Three layouts
//! are accepted, chosen by file extension:
//!
//! - `.csv` with `Field Name`, `Description` and `Allowable Values` headers
//! - `.json` holding an array of rule descriptions
//! - `.txt` / `.md` with one `Field Name: rule text` line per field

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info, warn};

use fieldcheck_model::{CompiledRule, RuleCategory, RuleDescription, RuleTable};

use crate::error::{IngestError, Result};

/// Headers of an exported rule table.
pub const RULE_TABLE_HEADERS: [&str; 4] =
    ["Field Name", "Original Rule", "Suggested Regex", "Category"];

/// Rulebook file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulebookFormat {
    Csv,
    Json,
    Text,
}

impl RulebookFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            Some("txt" | "md") => Ok(Self::Text),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// 1-based inclusive slice of extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordRange {
    pub first: Option<usize>,
    pub last: Option<usize>,
}

impl RecordRange {
    pub fn new(first: Option<usize>, last: Option<usize>) -> Self {
        Self { first, last }
    }

    /// Range covering every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        let first = self.first.unwrap_or(1);
        let last = self.last.unwrap_or(usize::MAX);
        if first == 0 || last == 0 || first > last {
            return Err(IngestError::InvalidRange { first, last });
        }
        Ok(())
    }

    /// Keep the records inside the range. Records past the end are ignored.
    pub fn apply<T>(&self, records: Vec<T>) -> Result<Vec<T>> {
        self.validate()?;
        let first = self.first.unwrap_or(1);
        let take = match self.last {
            Some(last) => last - first + 1,
            None => usize::MAX,
        };
        Ok(records.into_iter().skip(first - 1).take(take).collect())
    }
}

/// Loads a rulebook, choosing the parser from the file extension.
pub fn load_rulebook(path: &Path, range: RecordRange) -> Result<Vec<RuleDescription>> {
    let format = RulebookFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let descriptions = match format {
        RulebookFormat::Csv => parse_rulebook_csv(content.as_bytes(), path)?,
        RulebookFormat::Json => parse_rulebook_json(&content, path)?,
        RulebookFormat::Text => parse_rulebook_text(&content),
    };
    let extracted = descriptions.len();
    let selected = range.apply(descriptions)?;
    info!(
        path = %path.display(),
        ?format,
        extracted,
        selected = selected.len(),
        "loaded rulebook"
    );
    Ok(selected)
}

/// Collapse a header to lowercase alphanumerics for lenient matching.
fn header_key(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (header_key(header), idx))
        .collect()
}

fn required_column(index: &HashMap<String, usize>, name: &str, path: &Path) -> Result<usize> {
    index
        .get(&header_key(name))
        .copied()
        .ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|idx| record.get(idx))
        .unwrap_or_default()
        .to_string()
}

/// Parses a CSV rulebook. `Field Name` is required, the other columns
/// default to empty text.
pub fn parse_rulebook_csv<R: Read>(reader: R, path: &Path) -> Result<Vec<RuleDescription>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let index = header_index(&headers);
    let field_idx = required_column(&index, "Field Name", path)?;
    let description_idx = index.get(&header_key("Description")).copied();
    let values_idx = index.get(&header_key("Allowable Values")).copied();
    if values_idx.is_none() {
        warn!(path = %path.display(), "rulebook has no Allowable Values column");
    }

    let mut descriptions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?;
        descriptions.push(RuleDescription::new(
            field(&record, Some(field_idx)),
            field(&record, description_idx),
            field(&record, values_idx),
        ));
    }
    Ok(descriptions)
}

pub fn parse_rulebook_json(content: &str, path: &Path) -> Result<Vec<RuleDescription>> {
    serde_json::from_str(content).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `Field Name: rule text` lines. Blank lines and `#` comments are
/// skipped; lines without a colon are ignored with a warning.
pub fn parse_rulebook_text(content: &str) -> Vec<RuleDescription> {
    let mut descriptions = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, text)) = line.split_once(':') else {
            warn!(line = idx + 1, "rulebook line has no 'Field: rule' separator");
            continue;
        };
        descriptions.push(RuleDescription::new(name.trim(), "", text.trim()));
    }
    descriptions
}

/// Free-text rule sentences: every non-blank line mentioning "must".
pub fn load_rule_sentences(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let sentences = rule_sentences(&content);
    debug!(path = %path.display(), sentences = sentences.len(), "loaded rule sentences");
    Ok(sentences)
}

pub fn rule_sentences(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.to_lowercase().contains("must"))
        .map(str::to_string)
        .collect()
}

/// Loads a rule table previously exported (and possibly hand-edited).
///
/// A blank regex makes the rule not applicable. The category column is
/// optional; an unknown or missing category on a rule with a pattern is
/// treated as a custom pattern. Patterns are not checked here, so a broken
/// edit surfaces as an invalid pattern during validation.
pub fn load_rule_table(path: &Path) -> Result<RuleTable> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);
    let headers = reader
        .headers()
        .map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let index = header_index(&headers);
    let field_idx = required_column(&index, RULE_TABLE_HEADERS[0], path)?;
    let text_idx = index.get(&header_key(RULE_TABLE_HEADERS[1])).copied();
    let pattern_idx = required_column(&index, RULE_TABLE_HEADERS[2], path)?;
    let category_idx = index.get(&header_key(RULE_TABLE_HEADERS[3])).copied();

    let mut rules: Vec<CompiledRule> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?;
        let field_name = field(&record, Some(field_idx)).trim().to_string();
        if field_name.is_empty() {
            continue;
        }
        let pattern = field(&record, Some(pattern_idx));
        let pattern = (!pattern.trim().is_empty()).then_some(pattern);
        let category = match &pattern {
            None => RuleCategory::NotApplicable,
            Some(_) => RuleCategory::from_str(&field(&record, category_idx))
                .ok()
                .filter(|category| *category != RuleCategory::NotApplicable)
                .unwrap_or(RuleCategory::Custom),
        };
        let rule = CompiledRule {
            field_name,
            original_text: field(&record, text_idx),
            pattern,
            category,
        };
        match rules.iter_mut().find(|r| r.field_name == rule.field_name) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    info!(path = %path.display(), rules = rules.len(), "loaded rule table");
    Ok(RuleTable::new(rules))
}
