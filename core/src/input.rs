use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::model::dataset::Entry;
use crate::time::{format_date, parse_date};

pub const READING_KEYS: [&str; 3] = ["date", "value", "name"];

/// A reading typed on the command line as `date:2024-05-01 value:1234`.
#[derive(Debug, PartialEq)]
pub struct ParsedReading {
    pub entry: Entry,
    /// Optional dataset rename (`name:...`).
    pub name: Option<String>,
}

/// Resolves `key` to the single candidate it equals or prefixes.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|c| c.starts_with(key))
        .copied()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

pub fn parse_reading_args(args: &[String]) -> Result<ParsedReading> {
    let mut fields: HashMap<String, String> = HashMap::new();

    for arg in args {
        let (key, value) = arg
            .split_once(':')
            .filter(|(k, _)| !k.is_empty())
            .ok_or_else(|| anyhow!("Expected key:value, got '{}'", arg))?;
        let key = expand_key(&key.to_lowercase(), &READING_KEYS)?;
        fields.insert(key, value.trim().to_string());
    }

    let raw_date = fields.get("date").ok_or_else(|| anyhow!("date is required"))?;
    let date = parse_date(raw_date).ok_or_else(|| anyhow!("Invalid date '{}', expected YYYY-MM-DD", raw_date))?;

    let raw_value = fields.get("value").ok_or_else(|| anyhow!("value is required"))?;
    let value: f64 = raw_value
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| anyhow!("Invalid value '{}'", raw_value))?;

    Ok(ParsedReading {
        entry: Entry::new(format_date(date), value),
        name: fields.get("name").filter(|n| !n.is_empty()).cloned(),
    })
}
