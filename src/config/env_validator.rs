//! Value validation with typo suggestions
//!
//! Environment values and config keys are checked against a closed set of
//! accepted spellings. A near miss (at most two edits) gets a
//! "did you mean" hint in the error or warning.

use crate::error::ConfigError;

/// Validator for one configuration value
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse `value`, or fail with the accepted spellings and a suggestion
    pub fn parse<T, F>(&self, value: &str, parser: F) -> Result<T, ConfigError>
    where
        F: Fn(&str) -> Option<T>,
    {
        parser(value).ok_or_else(|| {
            let hint = match suggest(value, self.valid_values) {
                Some(s) => format!("did you mean '{}'? ", s),
                None => String::new(),
            };
            ConfigError::InvalidValue {
                key: self.var_name.to_string(),
                value: value.to_string(),
                reason: format!("{}valid values: {}", hint, self.valid_values.join(", ")),
            }
        })
    }
}

/// Closest candidate within two edits, if any. Exact matches return `None`.
pub fn suggest<'c>(value: &str, candidates: &[&'c str]) -> Option<&'c str> {
    let input = value.to_lowercase();
    candidates
        .iter()
        .map(|c| (*c, levenshtein(&input, c)))
        .filter(|(_, d)| *d > 0 && *d <= 2)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Edit distance over chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Parser for the boolean spellings accepted in env values
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub const BOOL_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];
