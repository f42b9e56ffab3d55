use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outline stroke styles the settings surface offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Double => "double",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown border style: {0}")]
pub struct ParseBorderStyleError(String);

impl core::str::FromStr for BorderStyle {
    type Err = ParseBorderStyleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "double" => Ok(Self::Double),
            other => Err(ParseBorderStyleError(other.to_owned())),
        }
    }
}

/// Global outline settings, one instance for the whole extension.
/// Size lives on a 1.0..=3.0 scale in half-pixel steps; any other
/// input snaps to the nearest legal value, on construction and on
/// deserialization alike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBorderSettings")]
pub struct BorderSettings {
    #[serde(rename = "borderSize")]
    pub size: f32,
    #[serde(rename = "borderStyle")]
    pub style: BorderStyle,
}

/// Unvalidated wire form; [`From`] funnels it through the snapping
/// constructor.
#[derive(Deserialize)]
struct RawBorderSettings {
    #[serde(rename = "borderSize")]
    size: f32,
    #[serde(rename = "borderStyle")]
    style: BorderStyle,
}

impl From<RawBorderSettings> for BorderSettings {
    fn from(raw: RawBorderSettings) -> Self {
        Self::new(raw.size, raw.style)
    }
}

impl BorderSettings {
    pub const MIN_SIZE: f32 = 1.0;
    pub const MAX_SIZE: f32 = 3.0;

    pub fn new(size: f32, style: BorderStyle) -> Self {
        Self {
            size: Self::snap_size(size),
            style,
        }
    }

    /// Clamp into range and snap to the 0.5 step grid.
    pub fn snap_size(size: f32) -> f32 {
        let clamped = size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
        (clamped * 2.0).round() / 2.0
    }
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            size: 1.0,
            style: BorderStyle::Solid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_snaps_to_half_steps() {
        assert_eq!(BorderSettings::new(1.74, BorderStyle::Solid).size, 1.5);
        assert_eq!(BorderSettings::new(1.76, BorderStyle::Solid).size, 2.0);
    }

    #[test]
    fn size_clamps_to_range() {
        assert_eq!(BorderSettings::new(0.0, BorderStyle::Solid).size, 1.0);
        assert_eq!(BorderSettings::new(9.0, BorderStyle::Solid).size, 3.0);
    }

    #[test]
    fn deserialization_snaps_like_construction() {
        let settings: BorderSettings =
            serde_json::from_str(r#"{"borderSize":2.4,"borderStyle":"dashed"}"#).unwrap();
        assert_eq!(settings, BorderSettings::new(2.5, BorderStyle::Dashed));

        let settings: BorderSettings =
            serde_json::from_str(r#"{"borderSize":9.0,"borderStyle":"solid"}"#).unwrap();
        assert_eq!(settings.size, 3.0);
    }

    #[test]
    fn style_round_trips_through_css_names() {
        for style in [
            BorderStyle::Solid,
            BorderStyle::Dashed,
            BorderStyle::Dotted,
            BorderStyle::Double,
        ] {
            assert_eq!(style.as_css().parse::<BorderStyle>(), Ok(style));
        }
        assert!("groove".parse::<BorderStyle>().is_err());
    }
}
