//! Long-option lists forwarded to git pass-through commands

/// Value of a single `--key` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Rendered as `--key` when true, omitted when false
    Flag(bool),
    /// Rendered as `--key=value`, omitted when empty
    Value(String),
}

/// Ordered `--key[=value]` options
///
/// Falsy entries (false flags, empty values) are dropped when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOptions {
    entries: Vec<(String, OptionValue)>,
}

impl GitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boolean flag
    pub fn flag(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.entries.push((key.into(), OptionValue::Flag(enabled)));
        self
    }

    /// Add a keyed value
    pub fn value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), OptionValue::Value(value.into())));
        self
    }

    /// Render as command line arguments
    pub fn to_args(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(key, value)| match value {
                OptionValue::Flag(true) => Some(format!("--{}", key)),
                OptionValue::Value(v) if !v.is_empty() => Some(format!("--{}={}", key, v)),
                _ => None,
            })
            .collect()
    }
}
