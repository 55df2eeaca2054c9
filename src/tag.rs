//! Tokenizer for the annotation text attached to source fields.
//!
//! Grammar: `key[=value[,value...]][;key2...]`. Values may be separated by commas,
//! whitespace, or both, so `path=a,b` and `path=a b` are equivalent. The
//! tokenizer knows nothing about what keys mean; that is the job of
//! [`annotation`](crate::annotation).

use crate::error::{MapperError, Result};

/// One `;`-separated parameter of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The parameter key.
    pub key: String,
    /// `None` for a bare key, `Some` (possibly empty) when `=` was present.
    pub values: Option<Vec<String>>,
}

impl Param {
    /// Returns true when the parameter was written with `=`.
    pub fn has_values(&self) -> bool {
        self.values.is_some()
    }
}

/// Splits annotation text into its parameters.
///
/// Empty or blank text yields no parameters.
///
/// # Errors
/// Returns [`MapperError::Syntax`] for empty parameters (`a;;b`, a trailing `;`),
/// empty keys and keys containing whitespace.
pub fn parse(text: &str) -> Result<Vec<Param>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let syntax = |reason: String| MapperError::Syntax {
        tag: text.to_string(),
        reason,
    };

    let mut params = Vec::new();
    for (i, raw) in trimmed.split(';').enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(syntax(format!("parameter {} is empty", i + 1)));
        }

        let (key, values) = match raw.split_once('=') {
            Some((key, rest)) => {
                let values = rest
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                (key.trim(), Some(values))
            }
            None => (raw, None),
        };

        if key.is_empty() {
            return Err(syntax(format!("parameter {} has no key", i + 1)));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(syntax(format!("key \"{key}\" contains whitespace")));
        }

        params.push(Param {
            key: key.to_string(),
            values,
        });
    }
    Ok(params)
}
