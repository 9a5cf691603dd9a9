use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::text::Text;

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("expected key=value, got '{0}'")]
    MissingEquals(String),
    #[error("empty parameter name in '{0}'")]
    EmptyKey(String),
}

/// The parameter context consulted by `param` and the conditionals.
///
/// Supplied per articulation and replaced wholesale, never merged.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: FxHashMap<String, Text>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Text>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Text>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Text> {
        self.values.get(key)
    }

    /// Returns true if `key` is present and its value is truthy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(Text::is_truthy)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameter names in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Parse a `key=value` assignment as typed on a command line.
    ///
    /// `true`/`false` become booleans, integers and finite floats become
    /// numbers, and anything else (including an empty value) stays text.
    pub fn parse_assignment(input: &str) -> Result<(String, Text), ParamsError> {
        let (key, raw) = input
            .split_once('=')
            .ok_or_else(|| ParamsError::MissingEquals(input.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParamsError::EmptyKey(input.to_string()));
        }
        Ok((key.to_string(), parse_scalar(raw)))
    }
}

fn parse_scalar(raw: &str) -> Text {
    match raw {
        "true" => return Text::Bool(true),
        "false" => return Text::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Text::Int(n);
    }
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() => Text::Float(x),
        _ => Text::Literal(raw.to_string()),
    }
}

impl<K: Into<String>, V: Into<Text>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
