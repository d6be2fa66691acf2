//! Chip creation and configuration.
//!
//! The engine never interprets visual settings. It hands a
//! [`ChipConfiguration`] to the [`ChipFactory`] and lets the factory decide
//! what that means for the chip.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Chip;

/// Optional styling values passed from the host to the chip factory.
///
/// `None` means "leave the chip's current value alone".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChipConfiguration {
    /// Horizontal space between chips (split evenly left/right)
    pub horizontal_spacing: Option<u32>,
    /// Vertical space between chips on consecutive lines
    pub vertical_spacing: Option<u32>,
    pub corner_radius: Option<u32>,
    /// Background color as 0xRRGGBBAA
    pub background_color: Option<u32>,
    /// Text color as 0xRRGGBBAA
    pub text_color: Option<u32>,
    pub text_size: Option<u32>,
    /// Fixed height of a chip
    pub height: Option<u32>,
    /// Width available for a chip before its text is truncated
    pub max_available_width: Option<u32>,
}

/// Style values a chip carries after configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChipStyle {
    pub left_margin: Option<u32>,
    pub right_margin: Option<u32>,
    pub vertical_spacing: Option<u32>,
    pub corner_radius: Option<u32>,
    pub background_color: Option<u32>,
    pub text_color: Option<u32>,
    pub text_size: Option<u32>,
    pub height: Option<u32>,
    pub max_available_width: Option<u32>,
}

/// Creates, recreates and configures chips.
pub trait ChipFactory {
    /// Create a new chip from raw text and optional data
    fn create_chip(&self, text: &str, data: Option<Value>) -> Chip;

    /// Recreate a chip from an existing one (new identity, same text/data)
    fn recreate_chip(&self, existing: &Chip) -> Chip;

    /// Apply visual configuration just before the chip is inserted into text
    fn configure_chip(&self, chip: &mut Chip, config: &ChipConfiguration);
}

/// Factory producing plain [`Chip`]s and copying configuration into their style.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultChipFactory;

impl ChipFactory for DefaultChipFactory {
    fn create_chip(&self, text: &str, data: Option<Value>) -> Chip {
        Chip::new(text, data)
    }

    fn recreate_chip(&self, existing: &Chip) -> Chip {
        Chip::duplicate(existing)
    }

    fn configure_chip(&self, chip: &mut Chip, config: &ChipConfiguration) {
        let style = chip.style_mut();
        if let Some(spacing) = config.horizontal_spacing {
            style.left_margin = Some(spacing / 2);
            style.right_margin = Some(spacing / 2);
        }
        if config.vertical_spacing.is_some() {
            style.vertical_spacing = config.vertical_spacing;
        }
        if config.corner_radius.is_some() {
            style.corner_radius = config.corner_radius;
        }
        if config.background_color.is_some() {
            style.background_color = config.background_color;
        }
        if config.text_color.is_some() {
            style.text_color = config.text_color;
        }
        if config.text_size.is_some() {
            style.text_size = config.text_size;
        }
        if config.height.is_some() {
            style.height = config.height;
        }
        if config.max_available_width.is_some() {
            style.max_available_width = config.max_available_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_splits_horizontal_spacing() {
        let factory = DefaultChipFactory;
        let mut chip = factory.create_chip("x", None);
        let config = ChipConfiguration {
            horizontal_spacing: Some(8),
            height: Some(32),
            ..Default::default()
        };
        factory.configure_chip(&mut chip, &config);

        assert_eq!(chip.style().left_margin, Some(4));
        assert_eq!(chip.style().right_margin, Some(4));
        assert_eq!(chip.style().height, Some(32));
        assert_eq!(chip.style().corner_radius, None);
    }

    #[test]
    fn test_configure_keeps_unset_values() {
        let factory = DefaultChipFactory;
        let mut chip = factory.create_chip("x", None);
        chip.style_mut().corner_radius = Some(6);
        factory.configure_chip(&mut chip, &ChipConfiguration::default());
        assert_eq!(chip.style().corner_radius, Some(6));
    }

    #[test]
    fn test_configuration_yaml_defaults() {
        let config: ChipConfiguration = serde_yaml::from_str("text_size: 14").unwrap();
        assert_eq!(config.text_size, Some(14));
        assert_eq!(config.height, None);
    }
}
