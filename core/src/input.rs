use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::model::stat::StatKey;

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub words: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` pairs from free words. A token with an empty key
/// (e.g. `:5`) is kept as a word.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut words = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        words.push(arg.clone());
    }

    ParsedInput { words, metadata }
}

/// Resolves a user-typed statistic name against short forms (`PTS`) and
/// field names (`points`), ignoring case. Exact matches win over prefixes.
pub fn expand_key(key: &str) -> Result<StatKey> {
    let needle = key.trim().to_lowercase();
    if needle.is_empty() {
        return Err(anyhow!("Empty statistic key"));
    }

    // 1. Exact match
    if let Some(stat) = StatKey::ALL.iter().find(|s| {
        s.short_form().to_lowercase() == needle || s.long_form().to_lowercase() == needle
    }) {
        return Ok(*stat);
    }

    // 2. Prefix match
    let matches: Vec<StatKey> = StatKey::ALL
        .iter()
        .filter(|s| {
            s.short_form().to_lowercase().starts_with(&needle)
                || s.long_form().to_lowercase().starts_with(&needle)
        })
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("Unknown statistic: '{}'", key)),
        _ => {
            let names: Vec<&str> = matches.iter().map(|s| s.long_form()).collect();
            Err(anyhow!("Ambiguous statistic: '{}' matches {:?}", key, names))
        }
    }
}

/// Parses `KEY:WEIGHT` arguments (`G:3 pts:5`) into weight assignments, in
/// argument order. Bare words are rejected.
pub fn parse_weight_args(args: &[String]) -> Result<Vec<(StatKey, u8)>> {
    let mut weights = Vec::new();

    for arg in args {
        let parsed = parse_args(std::slice::from_ref(arg));
        if let Some(word) = parsed.words.first() {
            return Err(anyhow!("Expected KEY:WEIGHT, got '{}'", word));
        }
        for (key, value) in parsed.metadata {
            let stat = expand_key(&key)?;
            let weight: u8 = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid weight '{}' for {}", value, stat.short_form()))?;
            weights.push((stat, weight));
        }
    }

    Ok(weights)
}
