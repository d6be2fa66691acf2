//! Command-line argument parsing for the chipfield binary
//!
//! Supports:
//! - Input from `--text` or stdin, typed or pasted
//! - Config file override and extra terminators
//! - Plain or JSON output of the resulting chips and tokens

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::chip::ChipInfo;
use crate::config::{parse_terminator_arg, ConfigError, FieldConfig, ValidatorKind};
use crate::field::ChipField;

/// Turn delimited text into chips
#[derive(Parser, Debug)]
#[command(name = "chipfield", version, about = "Turn delimited text into chips")]
pub struct CliArgs {
    /// Text to feed into the field; repeated values are separated by newlines.
    /// Reads stdin when omitted.
    #[arg(short, long, value_name = "TEXT")]
    pub text: Vec<String>,

    /// Insert the input as a single paste instead of typing it
    #[arg(short, long)]
    pub paste: bool,

    /// Chipify whatever tokens are left once the input is in
    #[arg(long)]
    pub validate: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Use this config file instead of the default one
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Add a terminator, e.g. `;=chipify-all` (repeatable)
    #[arg(long = "terminator", value_name = "CHAR=BEHAVIOR")]
    pub terminators: Vec<String>,

    /// Drop chips whose text is already present
    #[arg(short, long)]
    pub unique: bool,
}

impl CliArgs {
    /// Resolve the field configuration, applying command-line overrides
    pub fn field_config(&self) -> Result<FieldConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => FieldConfig::load_from(path)?,
            None => FieldConfig::load(),
        };
        for arg in &self.terminators {
            config.set_terminator(parse_terminator_arg(arg)?);
        }
        if self.validate {
            config.validator = ValidatorKind::Chipifying;
        }
        if self.unique {
            config.unique_chips = true;
        }
        Ok(config)
    }

    /// Input given on the command line, if any
    pub fn input(&self) -> Option<String> {
        if self.text.is_empty() {
            None
        } else {
            Some(self.text.join("\n"))
        }
    }
}

/// What the binary prints about a field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub chips: Vec<ChipInfo>,
    pub tokens: Vec<String>,
    pub text: String,
    pub valid: bool,
}

impl FieldReport {
    pub fn from_field(field: &ChipField) -> Self {
        Self {
            chips: field.all_chips().iter().map(|chip| chip.info()).collect(),
            tokens: field.token_values(),
            text: field.to_string(),
            valid: field.is_valid(),
        }
    }
}

impl fmt::Display for FieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chip in &self.chips {
            match &chip.data {
                Some(data) => writeln!(f, "chip: {} ({})", chip.text, data)?,
                None => writeln!(f, "chip: {}", chip.text)?,
            }
        }
        for token in &self.tokens {
            writeln!(f, "token: {}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminator::TerminatorBehavior;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "chipfield",
            "--text",
            "a,b",
            "--paste",
            "--terminator",
            ";=chipify-all",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.input().as_deref(), Some("a,b"));
        assert!(args.paste);
        assert!(args.json);
        assert_eq!(args.terminators, vec![";=chipify-all"]);
    }

    #[test]
    fn test_multiple_texts_join_with_newlines() {
        let args = CliArgs::try_parse_from(["chipfield", "-t", "a", "-t", "b"]).unwrap();
        assert_eq!(args.input().as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_no_text_reads_stdin() {
        let args = CliArgs::try_parse_from(["chipfield"]).unwrap();
        assert_eq!(args.input(), None);
    }

    #[test]
    fn test_terminator_override_reaches_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "terminators: []\n").unwrap();

        let args = CliArgs::try_parse_from([
            "chipfield",
            "--config",
            path.to_str().unwrap(),
            "--terminator",
            "space=chipify-to-terminator",
            "--validate",
        ])
        .unwrap();
        let config = args.field_config().unwrap();
        let map = config.terminator_map().unwrap();
        assert_eq!(map.get(&' '), Some(&TerminatorBehavior::ChipifyToTerminator));
        assert_eq!(map.len(), 1);
        assert_eq!(config.validator, ValidatorKind::Chipifying);
    }

    #[test]
    fn test_bad_terminator_is_an_error() {
        let args = CliArgs::try_parse_from(["chipfield", "--terminator", ";=nope"]).unwrap();
        assert!(matches!(
            args.field_config(),
            Err(ConfigError::InvalidBehavior(_))
        ));
    }

    #[test]
    fn test_report_display() {
        let mut field = FieldConfig::default().build_field().unwrap();
        field.type_text("a,b");
        let report = FieldReport::from_field(&field);
        assert_eq!(report.to_string(), "chip: a\ntoken: b\n");
        assert_eq!(report.text, "ab");
        assert!(report.valid);
    }
}
