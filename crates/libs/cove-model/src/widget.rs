use crate::activity::Priority;
use crate::content::ProgressIndicator;
use crate::error::ValidationError;
use crate::leaf::{ColorDescriptor, FontDescriptor, IconDescriptor, Size};
use crate::MAX_EMBEDDED_PAYLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_WIDGET_WIDTH: f64 = 500.0;
pub const MAX_WIDGET_HEIGHT: f64 = 300.0;
pub const MAX_GRAPH_POINTS: usize = 100;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum WidgetLayoutStyle {
    /// Single-line layout.
    #[default]
    Inline,
    /// Circular/ring layout for gauges.
    Circular,
    /// Card with flexible content.
    Card,
    /// Full-control custom layout.
    Custom,
}

impl WidgetLayoutStyle {
    /// Size used when the descriptor does not specify one.
    pub fn default_size(&self) -> Size {
        match self {
            Self::Inline => Size::new(200.0, 48.0),
            Self::Circular => Size::new(100.0, 100.0),
            Self::Card => Size::new(220.0, 120.0),
            Self::Custom => Size::new(150.0, 80.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum WidgetAlignment {
    Leading,
    #[default]
    Center,
    Trailing,
}

/// Placement on the lock screen. Offsets are clamped at construction:
/// vertical to `[-200, 200]`, horizontal to `[-300, 300]`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WidgetPosition {
    #[serde(default)]
    pub alignment: WidgetAlignment,
    #[serde(default)]
    pub vertical_offset: f64,
    #[serde(default)]
    pub horizontal_offset: f64,
}

impl WidgetPosition {
    pub fn new(alignment: WidgetAlignment, vertical_offset: f64, horizontal_offset: f64) -> Self {
        Self {
            alignment,
            vertical_offset: vertical_offset.clamp(-200.0, 200.0),
            horizontal_offset: horizontal_offset.clamp(-300.0, 300.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum WidgetMaterial {
    #[default]
    Frosted,
    Liquid,
    Solid,
    SemiTransparent,
    Clear,
}

/// Fine-grained tuning of the widget backdrop, used with the liquid material.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WidgetAppearance {
    #[serde(default)]
    pub tint_color: ColorDescriptor,
    pub tint_opacity: f64,
    #[serde(default)]
    pub enable_glass_highlight: bool,
    /// Host-defined liquid-glass preset, 0–19.
    #[serde(default)]
    pub liquid_glass_variant: u8,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TextAlignment {
    #[default]
    Leading,
    Center,
    Trailing,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum GaugeStyle {
    #[default]
    Circular,
    Linear,
}

/// Embedded web content rendered by the host's web view, capped at 5 MiB of
/// markup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WebContent {
    pub html: String,
    pub preferred_height: f64,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub allow_localhost_requests: bool,
}

impl WebContent {
    pub fn new(html: impl Into<String>, preferred_height: f64) -> Self {
        Self {
            html: html.into(),
            preferred_height,
            transparent: true,
            allow_localhost_requests: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.html.is_empty() {
            return Err(ValidationError::empty("web content html"));
        }
        if self.html.len() > MAX_EMBEDDED_PAYLOAD_BYTES {
            return Err(ValidationError::PayloadTooLarge {
                what: "web content html",
                limit: MAX_EMBEDDED_PAYLOAD_BYTES,
            });
        }
        Ok(())
    }
}

/// One element in a widget's ordered content sequence.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum WidgetContentElement {
    Text {
        text: String,
        font: FontDescriptor,
        #[serde(default)]
        color: Option<ColorDescriptor>,
        #[serde(default)]
        alignment: TextAlignment,
    },
    Icon {
        icon: IconDescriptor,
        #[serde(default)]
        tint: Option<ColorDescriptor>,
    },
    Progress {
        indicator: ProgressIndicator,
        value: f64,
        #[serde(default)]
        color: Option<ColorDescriptor>,
    },
    Graph {
        data: Vec<f64>,
        color: ColorDescriptor,
        size: Size,
    },
    Gauge {
        value: f64,
        min_value: f64,
        max_value: f64,
        #[serde(default)]
        style: GaugeStyle,
        #[serde(default)]
        color: Option<ColorDescriptor>,
    },
    Spacer {
        height: f64,
    },
    Divider {
        color: ColorDescriptor,
        thickness: f64,
    },
    WebView {
        content: WebContent,
    },
}

impl WidgetContentElement {
    pub fn text(text: impl Into<String>, font: FontDescriptor) -> Self {
        Self::Text { text: text.into(), font, color: None, alignment: TextAlignment::Leading }
    }

    pub fn icon(icon: IconDescriptor) -> Self {
        Self::Icon { icon, tint: None }
    }

    pub fn progress(indicator: ProgressIndicator, value: f64) -> Self {
        Self::Progress { indicator, value, color: None }
    }

    pub fn graph(data: Vec<f64>, color: ColorDescriptor, size: Size) -> Self {
        Self::Graph { data, color, size }
    }

    pub fn gauge(value: f64) -> Self {
        Self::Gauge { value, min_value: 0.0, max_value: 1.0, style: GaugeStyle::Circular, color: None }
    }

    pub fn spacer(height: f64) -> Self {
        Self::Spacer { height }
    }

    pub fn divider() -> Self {
        Self::Divider { color: ColorDescriptor::Gray, thickness: 1.0 }
    }

    pub fn web_view(content: WebContent) -> Self {
        Self::WebView { content }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Icon { icon, .. } => icon.validate()?,
            Self::Progress { indicator, .. } => indicator.validate()?,
            Self::Graph { data, size, .. } => {
                if data.is_empty() {
                    return Err(ValidationError::empty("graph data"));
                }
                if data.len() > MAX_GRAPH_POINTS {
                    return Err(ValidationError::out_of_range(
                        "graph data",
                        format!("{} points exceeds the {MAX_GRAPH_POINTS}-point cap", data.len()),
                    ));
                }
                if !size.is_positive() {
                    return Err(ValidationError::out_of_range(
                        "graph size",
                        format!("{}x{} is not strictly positive", size.width, size.height),
                    ));
                }
            }
            Self::Gauge { value, min_value, max_value, .. } => {
                if value < min_value || value > max_value {
                    return Err(ValidationError::out_of_range(
                        "gauge value",
                        format!("{value} not within [{min_value}, {max_value}]"),
                    ));
                }
            }
            Self::WebView { content } => content.validate()?,
            Self::Text { .. } | Self::Spacer { .. } | Self::Divider { .. } => {}
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Fully specifies one lock-screen widget.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LockScreenWidgetDescriptor {
    pub id: String,
    pub application_id: String,
    #[serde(default)]
    pub layout_style: WidgetLayoutStyle,
    #[serde(default)]
    pub position: WidgetPosition,
    pub size: Size,
    #[serde(default)]
    pub material: WidgetMaterial,
    #[serde(default)]
    pub appearance: Option<WidgetAppearance>,
    /// Clamped to `[0, 32]` at construction.
    #[serde(default)]
    pub corner_radius: f64,
    pub content: Vec<WidgetContentElement>,
    #[serde(default)]
    pub accent_color: ColorDescriptor,
    #[serde(default)]
    pub dismiss_on_unlock: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl LockScreenWidgetDescriptor {
    pub fn new(
        id: impl Into<String>,
        application_id: impl Into<String>,
        layout_style: WidgetLayoutStyle,
        content: Vec<WidgetContentElement>,
    ) -> Self {
        Self {
            id: id.into(),
            application_id: application_id.into(),
            layout_style,
            position: WidgetPosition::default(),
            size: layout_style.default_size(),
            material: WidgetMaterial::Frosted,
            appearance: None,
            corner_radius: 16.0,
            content,
            accent_color: ColorDescriptor::Accent,
            dismiss_on_unlock: true,
            priority: Priority::Normal,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_position(mut self, position: WidgetPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_material(mut self, material: WidgetMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_appearance(mut self, appearance: WidgetAppearance) -> Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.clamp(0.0, 32.0);
        self
    }

    pub fn with_accent_color(mut self, color: ColorDescriptor) -> Self {
        self.accent_color = color;
        self
    }

    pub fn with_dismiss_on_unlock(mut self, dismiss: bool) -> Self {
        self.dismiss_on_unlock = dismiss;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty("widget id"));
        }
        if self.application_id.is_empty() {
            return Err(ValidationError::empty("application id"));
        }
        if self.content.is_empty() {
            return Err(ValidationError::empty("widget content"));
        }
        if !self.size.is_positive() {
            return Err(ValidationError::out_of_range(
                "widget size",
                format!("{}x{} is not strictly positive", self.size.width, self.size.height),
            ));
        }
        if self.size.width > MAX_WIDGET_WIDTH || self.size.height > MAX_WIDGET_HEIGHT {
            return Err(ValidationError::out_of_range(
                "widget size",
                format!(
                    "{}x{} exceeds the {MAX_WIDGET_WIDTH}x{MAX_WIDGET_HEIGHT} cap",
                    self.size.width, self.size.height
                ),
            ));
        }
        for element in &self.content {
            element.validate()?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
