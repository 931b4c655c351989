use crate::error::ValidationError;
use crate::leaf::{ColorDescriptor, FontDescriptor, FontWeight, IconDescriptor, Size};
use crate::MAX_EMBEDDED_PAYLOAD_BYTES;
use serde::{Deserialize, Serialize};

/// Content rendered on the trailing (right) side of a live activity.
///
/// Closed sum type: each variant serializes with an explicit `kind`
/// discriminant. Defaults the host relies on (fonts, sizes) are supplied by
/// the constructor functions, never implied by the wire schema.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum TrailingContent {
    Text {
        text: String,
        font: FontDescriptor,
    },
    /// Scrolling text; `min_duration_secs` is the minimum per-glyph scroll
    /// duration the host honors.
    Marquee {
        text: String,
        font: FontDescriptor,
        min_duration_secs: f64,
    },
    /// Live countdown to `target_epoch_ms`, rendered mm:ss or HH:mm:ss.
    Countdown {
        target_epoch_ms: i64,
        font: FontDescriptor,
    },
    Icon {
        icon: IconDescriptor,
    },
    /// Audio-style spectrum visualization.
    Spectrum {
        color: ColorDescriptor,
    },
    /// Embedded animation payload (host-decoded), capped at 5 MiB.
    Animation {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
        size: Size,
    },
    Ring {
        value: f64,
        diameter: f64,
        stroke_width: f64,
    },
    Bar {
        value: f64,
        total: f64,
        width: f64,
        height: f64,
    },
    #[default]
    None,
}

impl TrailingContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into(), font: FontDescriptor::system(12.0, FontWeight::Medium) }
    }

    pub fn marquee(text: impl Into<String>, min_duration_secs: f64) -> Self {
        Self::Marquee {
            text: text.into(),
            font: FontDescriptor::system(12.0, FontWeight::Semibold),
            min_duration_secs,
        }
    }

    pub fn countdown(target_epoch_ms: i64) -> Self {
        Self::Countdown {
            target_epoch_ms,
            font: FontDescriptor::monospaced_digit(13.0, FontWeight::Semibold),
        }
    }

    pub fn icon(icon: IconDescriptor) -> Self {
        Self::Icon { icon }
    }

    pub fn spectrum() -> Self {
        Self::Spectrum { color: ColorDescriptor::Accent }
    }

    pub fn animation(data: Vec<u8>) -> Self {
        Self::Animation { data, size: Size::new(50.0, 30.0) }
    }

    pub fn ring(value: f64) -> Self {
        Self::Ring { value, diameter: 24.0, stroke_width: 3.0 }
    }

    pub fn bar(value: f64, total: f64) -> Self {
        Self::Bar { value, total, width: 90.0, height: 4.0 }
    }

    /// Whether this content may be used as a leading content override.
    /// Only icon and animation content fit the leading slot.
    pub fn is_leading_compatible(&self) -> bool {
        matches!(self, Self::Icon { .. } | Self::Animation { .. })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Marquee { text, .. } => {
                if text.is_empty() {
                    return Err(ValidationError::empty("marquee text"));
                }
            }
            Self::Icon { icon } => icon.validate()?,
            Self::Animation { data, .. } => {
                if data.len() > MAX_EMBEDDED_PAYLOAD_BYTES {
                    return Err(ValidationError::PayloadTooLarge {
                        what: "trailing animation data",
                        limit: MAX_EMBEDDED_PAYLOAD_BYTES,
                    });
                }
            }
            Self::Ring { value, .. } => {
                if !(0.0..=1.0).contains(value) {
                    return Err(ValidationError::out_of_range(
                        "ring value",
                        format!("{value} not within [0, 1]"),
                    ));
                }
            }
            Self::Bar { value, total, .. } => {
                if *total <= 0.0 {
                    return Err(ValidationError::out_of_range(
                        "bar total",
                        format!("{total} is not strictly positive"),
                    ));
                }
                if *value < 0.0 || value > total {
                    return Err(ValidationError::out_of_range(
                        "bar value",
                        format!("{value} not within [0, {total}]"),
                    ));
                }
            }
            Self::Text { .. } | Self::Countdown { .. } | Self::Spectrum { .. } | Self::None => {}
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Visual progress treatment for a live activity. The progress value itself
/// lives on the descriptor; the indicator only chooses the rendering.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ProgressIndicator {
    Ring {
        diameter: f64,
        stroke_width: f64,
    },
    Bar {
        width: Option<f64>,
        height: f64,
        corner_radius: f64,
    },
    Percentage {
        font: FontDescriptor,
    },
    Countdown {
        font: FontDescriptor,
    },
    /// Custom animation payload, capped at 5 MiB.
    Animation {
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
        size: Size,
    },
    #[default]
    None,
}

impl ProgressIndicator {
    pub fn ring() -> Self {
        Self::Ring { diameter: 24.0, stroke_width: 3.0 }
    }

    pub fn bar(width: Option<f64>) -> Self {
        Self::Bar { width, height: 4.0, corner_radius: 2.0 }
    }

    pub fn percentage() -> Self {
        Self::Percentage { font: FontDescriptor::system(13.0, FontWeight::Semibold) }
    }

    pub fn countdown() -> Self {
        Self::Countdown { font: FontDescriptor::monospaced_digit(13.0, FontWeight::Semibold) }
    }

    pub fn animation(data: Vec<u8>) -> Self {
        Self::Animation { data, size: Size::new(30.0, 30.0) }
    }

    /// A renderable indicator occupies the trailing slot; `None` does not.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Self::Animation { data, .. } = self {
            if data.len() > MAX_EMBEDDED_PAYLOAD_BYTES {
                return Err(ValidationError::PayloadTooLarge {
                    what: "progress animation data",
                    limit: MAX_EMBEDDED_PAYLOAD_BYTES,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
