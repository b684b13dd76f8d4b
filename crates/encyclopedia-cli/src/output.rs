//! Output formatting utilities

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format '{}' (expected table or json)", other),
        }
    }
}

/// Render `data` as pretty JSON, or through `table` for plain text
pub fn format_output<T: Serialize>(
    data: &T,
    format: OutputFormat,
    table: impl FnOnce(&T) -> String,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Table => Ok(table(data)),
    }
}

/// Print `data` in the requested format
pub fn print_output<T: Serialize>(
    data: &T,
    format: OutputFormat,
    table: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let rendered = format_output(data, format, table)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" table ".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_output() {
        let data = vec!["a", "b"];
        let json = format_output(&data, OutputFormat::Json, |_| String::new()).unwrap();
        assert!(json.contains("\"a\""));

        let table = format_output(&data, OutputFormat::Table, |d| d.join("\n")).unwrap();
        assert_eq!(table, "a\nb");
    }
}
