//! Visual attributes of elements.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error returned when a CSS color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color: {0:?}")]
pub struct ColorParseError(pub String);

/// RGBA8 color, serialized as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or `transparent`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::transparent());
        }
        let err = || ColorParseError(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| err())
        };
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Open style record.
///
/// The typed fields are the ones the engine reads (color sampling, defaults,
/// the render adapter). Anything else lands in `extra` and round-trips
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgba>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Keys the engine does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Style {
    /// Shallow-merge `patch` into `self`: every field set in `patch` wins,
    /// unset fields keep their current value.
    pub fn merge(&mut self, patch: &Style) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.fill, &patch.fill);
        take(&mut self.color, &patch.color);
        take(&mut self.background, &patch.background);
        take(&mut self.stroke, &patch.stroke);
        take(&mut self.stroke_width, &patch.stroke_width);
        take(&mut self.font_size, &patch.font_size);
        take(&mut self.font_family, &patch.font_family);
        take(&mut self.font_weight, &patch.font_weight);
        take(&mut self.text_align, &patch.text_align);
        take(&mut self.border_radius, &patch.border_radius);
        take(&mut self.opacity, &patch.opacity);
        self.extra
            .extend(patch.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Builder-style setter for the fill color.
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Builder-style setter for the text color.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::from_hex("#fff").unwrap(), Rgba::white());
        assert_eq!(Rgba::from_hex("#1F2937").unwrap(), Rgba::rgb(0x1f, 0x29, 0x37));
        assert_eq!(
            Rgba::from_hex("#11223380").unwrap(),
            Rgba::new(0x11, 0x22, 0x33, 0x80)
        );
        assert_eq!(Rgba::from_hex("transparent").unwrap(), Rgba::transparent());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rgba::from_hex("red").is_err());
        assert!(Rgba::from_hex("#12").is_err());
        assert!(Rgba::from_hex("#zzzzzz").is_err());
        assert!(Rgba::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgba::rgb(255, 0, 128).to_hex(), "#ff0080");
        assert_eq!(Rgba::new(0, 0, 0, 0).to_hex(), "#00000000");
    }

    #[test]
    fn test_peniko_conversion() {
        let c = Rgba::new(10, 20, 30, 40);
        let back: Rgba = Color::from(c).into();
        assert_eq!(back, c);
    }

    #[test]
    fn test_merge_keeps_untouched_fields() {
        let mut style = Style {
            fill: Some(Rgba::white()),
            font_size: Some(18.0),
            ..Default::default()
        };
        let patch = Style {
            font_size: Some(24.0),
            ..Default::default()
        };
        style.merge(&patch);
        assert_eq!(style.fill, Some(Rgba::white()));
        assert_eq!(style.font_size, Some(24.0));
    }

    #[test]
    fn test_unknown_keys_round_trip() {
        let json = r##"{"fill":"#ff0000","letterSpacing":"2px","shadow":{"blur":4}}"##;
        let style: Style = serde_json::from_str(json).unwrap();
        assert_eq!(style.fill, Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(style.extra.len(), 2);

        let out = serde_json::to_value(&style).unwrap();
        assert_eq!(out["letterSpacing"], "2px");
        assert_eq!(out["shadow"]["blur"], 4);
    }

    #[test]
    fn test_merge_extra_keys() {
        let mut style = Style::default();
        let mut patch = Style::default();
        patch
            .extra
            .insert("textShadow".into(), serde_json::json!("1px 1px #000"));
        style.merge(&patch);
        assert!(style.extra.contains_key("textShadow"));
    }
}
