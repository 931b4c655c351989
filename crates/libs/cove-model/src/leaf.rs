use crate::error::ValidationError;
use crate::MAX_EMBEDDED_PAYLOAD_BYTES;
use serde::{Deserialize, Serialize};

/// Icon shown in an activity or widget: either a named system symbol resolved
/// by the host, or raw image bytes shipped with the descriptor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum IconDescriptor {
    Symbol {
        name: String,
    },
    Image {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    },
}

impl IconDescriptor {
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol { name: name.into() }
    }

    pub fn image(data: Vec<u8>) -> Self {
        Self::Image { data }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Symbol { name } => {
                if name.is_empty() {
                    return Err(ValidationError::empty("icon symbol name"));
                }
            }
            Self::Image { data } => {
                if data.is_empty() {
                    return Err(ValidationError::empty("icon image data"));
                }
                if data.len() > MAX_EMBEDDED_PAYLOAD_BYTES {
                    return Err(ValidationError::PayloadTooLarge {
                        what: "icon image data",
                        limit: MAX_EMBEDDED_PAYLOAD_BYTES,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Color reference resolved by the host. Named entries follow the host's
/// palette; `Custom` carries explicit RGBA components in `[0, 1]`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColorDescriptor {
    #[default]
    Accent,
    White,
    Gray,
    Blue,
    Green,
    Orange,
    Purple,
    Red,
    Custom {
        red: f64,
        green: f64,
        blue: f64,
        alpha: f64,
    },
}

impl ColorDescriptor {
    pub fn custom(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self::Custom { red, green, blue, alpha }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Custom { red, green, blue, alpha } => {
                [red, green, blue, alpha].iter().all(|c| (0.0..=1.0).contains(*c))
            }
            _ => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FontWeight {
    UltraLight,
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
    Black,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FontDesign {
    #[default]
    Default,
    Serif,
    Rounded,
    Monospaced,
}

/// Font used by text-bearing content. Point size plus host-interpreted weight
/// and design.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FontDescriptor {
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub design: FontDesign,
    #[serde(default)]
    pub monospaced_digit: bool,
}

impl FontDescriptor {
    pub fn system(size: f64, weight: FontWeight) -> Self {
        Self { size, weight, design: FontDesign::Default, monospaced_digit: false }
    }

    pub fn monospaced_digit(size: f64, weight: FontWeight) -> Self {
        Self { size, weight, design: FontDesign::Default, monospaced_digit: true }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::system(12.0, FontWeight::Regular)
    }
}

/// Width and height in points.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
