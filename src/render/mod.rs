//! Rendering command results as tables, JSON or YAML.

pub mod comparison;
pub mod keys;
pub mod runtimes;

use serde::Serialize;

use crate::error::Result;

pub use comparison::{comparison_summary, comparison_table, styled_status};
pub use keys::{client_keys_table, server_keys_table};
pub use runtimes::{runtime_table, runtimes_table};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Whether progress chatter should accompany the output.
    pub fn is_table(self) -> bool {
        self == OutputFormat::Table
    }
}

/// Pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?)
}

/// YAML, without the trailing newline.
pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let yaml = serde_yaml::to_string(value).map_err(anyhow::Error::from)?;
    Ok(yaml.trim_end().to_string())
}

/// Serialize `value` as JSON or YAML; `None` for table output.
pub fn to_structured<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Table => Ok(None),
        OutputFormat::Json => to_json(value).map(Some),
        OutputFormat::Yaml => to_yaml(value).map(Some),
    }
}
