//! Field configuration persistence
//!
//! Stores chip field settings in `~/.config/chipfield/config.yaml`

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chip::ChipConfiguration;
use crate::editable::IllegalCharacters;
use crate::field::{ChipField, EditChipOnClick};
use crate::terminator::{DefaultTerminatorHandler, PasteBehavior, TerminatorBehavior};
use crate::tokenizer::{SpanChipTokenizer, TokenDelimiter, UniqueChipTokenizer};
use crate::validator::ChipifyingValidator;

/// Errors that can occur when loading a field configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    InvalidCharacter(String),
    InvalidBehavior(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::InvalidCharacter(c) => write!(f, "Invalid terminator character: {}", c),
            ConfigError::InvalidBehavior(b) => write!(f, "Invalid terminator behavior: {}", b),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A terminator character and what it does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminatorEntry {
    /// A single character, or one of `newline`, `space`, `tab`
    pub character: String,
    pub behavior: TerminatorBehavior,
}

impl TerminatorEntry {
    pub fn new(ch: char, behavior: TerminatorBehavior) -> Self {
        Self {
            character: ch.to_string(),
            behavior,
        }
    }

    pub fn char(&self) -> Result<char, ConfigError> {
        parse_terminator_char(&self.character)
    }
}

/// Which validator the field uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidatorKind {
    #[default]
    None,
    Chipifying,
}

/// Chip field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub terminators: Vec<TerminatorEntry>,
    pub paste_behavior: PasteBehavior,
    /// Characters stripped from typed and pasted text
    pub illegal_characters: String,
    pub token_delimiter: TokenDelimiter,
    /// Refuse to create two chips with the same text
    pub unique_chips: bool,
    pub validator: ValidatorKind,
    pub edit_chip_on_click: Option<EditChipOnClick>,
    pub chip: ChipConfiguration,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            terminators: vec![
                TerminatorEntry::new('\n', TerminatorBehavior::ChipifyAll),
                TerminatorEntry::new(',', TerminatorBehavior::ChipifyCurrentToken),
                TerminatorEntry::new(';', TerminatorBehavior::ChipifyCurrentToken),
            ],
            paste_behavior: PasteBehavior::default(),
            illegal_characters: String::new(),
            token_delimiter: TokenDelimiter::default(),
            unique_chips: false,
            validator: ValidatorKind::default(),
            edit_chip_on_click: None,
            chip: ChipConfiguration::default(),
        }
    }
}

impl FieldConfig {
    /// Load config from disk, or return defaults if not found or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse and check a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.terminator_map()?;
        Ok(config)
    }

    /// Add or replace the behavior of a terminator
    pub fn set_terminator(&mut self, entry: TerminatorEntry) {
        self.terminators.retain(|e| e.character != entry.character);
        self.terminators.push(entry);
    }

    /// Terminators keyed by character; later entries win
    pub fn terminator_map(&self) -> Result<HashMap<char, TerminatorBehavior>, ConfigError> {
        self.terminators
            .iter()
            .map(|entry| Ok((entry.char()?, entry.behavior)))
            .collect()
    }

    /// Build a field wired up according to this config
    pub fn build_field(&self) -> Result<ChipField, ConfigError> {
        let mut handler = DefaultTerminatorHandler::new();
        for (ch, behavior) in self.terminator_map()? {
            handler = handler.with_terminator(ch, behavior);
        }
        handler = handler.with_paste_behavior(self.paste_behavior);

        let tokenizer = SpanChipTokenizer::new().with_delimiter(self.token_delimiter);
        let field = if self.unique_chips {
            ChipField::new().with_tokenizer(UniqueChipTokenizer::wrap(tokenizer))
        } else {
            ChipField::new().with_tokenizer(tokenizer)
        };
        let mut field = field.with_terminator_handler(handler);

        if !self.illegal_characters.is_empty() {
            field = field
                .with_illegal_characters(IllegalCharacters::from_chars(self.illegal_characters.chars()));
        }
        if self.validator == ValidatorKind::Chipifying {
            field = field.with_validator(ChipifyingValidator);
        }
        if let Some(settings) = self.edit_chip_on_click {
            field.enable_edit_chip_on_click(settings.move_to_end, settings.chipify_unterminated);
        }
        field.set_chip_configuration(self.chip);

        tracing::debug!(
            terminators = self.terminators.len(),
            unique = self.unique_chips,
            delimiter = ?self.token_delimiter,
            "built chip field from config"
        );
        Ok(field)
    }
}

/// Parse a terminator name into its character
pub fn parse_terminator_char(s: &str) -> Result<char, ConfigError> {
    match s {
        "newline" | "\\n" => return Ok('\n'),
        "space" => return Ok(' '),
        "tab" | "\\t" => return Ok('\t'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ConfigError::InvalidCharacter(format!("{:?}", s))),
    }
}

/// Parse a `kebab-case` behavior name
pub fn parse_behavior(s: &str) -> Result<TerminatorBehavior, ConfigError> {
    match s {
        "chipify-all" => Ok(TerminatorBehavior::ChipifyAll),
        "chipify-current-token" => Ok(TerminatorBehavior::ChipifyCurrentToken),
        "chipify-to-terminator" => Ok(TerminatorBehavior::ChipifyToTerminator),
        _ => Err(ConfigError::InvalidBehavior(s.to_string())),
    }
}

/// Parse a `CHAR=BEHAVIOR` pair such as `;=chipify-all`
pub fn parse_terminator_arg(s: &str) -> Result<TerminatorEntry, ConfigError> {
    let (ch, behavior) = s
        .rsplit_once('=')
        .ok_or_else(|| ConfigError::InvalidBehavior(format!("expected CHAR=BEHAVIOR, got {}", s)))?;
    let ch = parse_terminator_char(ch)?;
    Ok(TerminatorEntry::new(ch, parse_behavior(behavior)?))
}
