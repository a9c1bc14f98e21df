//! Site configuration.

use indexmap::IndexMap;
use serde::Deserialize;

/// Errors from loading or checking a [`SiteConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(String),

    #[error("invalid mapping `{key}`: {reason}")]
    InvalidMapping { key: String, reason: &'static str },

    #[error("`{0}` must be greater than zero")]
    ZeroFuel(&'static str),
}

/// Settings that shape the schema build and query compilation.
///
/// ```json
/// {
///   "mapping": { "MarkdownRemark.frontmatter.author": "AuthorYaml.name" },
///   "execFuel": 1000000,
///   "recursionFuel": 512
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    /// `Type.field.path` → `TargetType` or `TargetType.field`.
    pub mapping: IndexMap<String, String>,
    /// Parser operation limit. `None` keeps the parser default.
    pub exec_fuel: Option<u32>,
    /// Parser nesting limit. `None` keeps the parser default.
    pub recursion_fuel: Option<u32>,
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_mapping(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.mapping.insert(from.into(), to.into());
        self
    }

    pub fn with_exec_fuel(mut self, fuel: Option<u32>) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn with_recursion_fuel(mut self, fuel: Option<u32>) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exec_fuel == Some(0) {
            return Err(ConfigError::ZeroFuel("execFuel"));
        }
        if self.recursion_fuel == Some(0) {
            return Err(ConfigError::ZeroFuel("recursionFuel"));
        }
        for (key, target) in &self.mapping {
            let invalid = |reason| ConfigError::InvalidMapping {
                key: key.clone(),
                reason,
            };
            let mut path = key.split('.');
            if path.next().is_none_or(str::is_empty) || path.clone().next().is_none() {
                return Err(invalid("expected `Type.field`"));
            }
            if path.any(str::is_empty) {
                return Err(invalid("empty path segment"));
            }
            let mut target = target.split('.');
            if target.next().is_none_or(str::is_empty) {
                return Err(invalid("missing target type"));
            }
            match (target.next(), target.next()) {
                (Some(""), _) => return Err(invalid("empty target field")),
                (_, Some(_)) => return Err(invalid("target must be `Type` or `Type.field`")),
                _ => {}
            }
        }
        Ok(())
    }
}
