//! Descriptor data model for the Cove extension SDK.
//!
//! Everything the Cove shell can be asked to render is described by an
//! immutable descriptor value built from this crate:
//!
//! - [`LiveActivityDescriptor`] — a transient status surface in the
//!   notch/pill region
//! - [`LockScreenWidgetDescriptor`] — a widget shown while the device is
//!   locked
//! - [`NotchExperienceDescriptor`] — an expanded tab and/or minimalistic
//!   notch layout
//!
//! Each descriptor carries a pure, side-effect-free `validate()` /
//! `is_valid()`; a failing descriptor never reaches the wire. The [`wire`]
//! module is the one codec both sides of the IPC boundary share.

mod activity;
mod content;
mod error;
mod leaf;
mod notch;
mod widget;
pub mod wire;

pub use activity::{
    CenterTextStyle, LiveActivityDescriptor, Priority, SneakPeekConfig, SneakPeekStyle,
};
pub use content::{ProgressIndicator, TrailingContent};
pub use error::ValidationError;
pub use leaf::{ColorDescriptor, FontDescriptor, FontDesign, FontWeight, IconDescriptor, Size};
pub use notch::{
    NotchExperienceDescriptor, NotchMinimalisticConfig, NotchSection, NotchSectionLayout,
    NotchTabConfig,
};
pub use widget::{
    GaugeStyle, LockScreenWidgetDescriptor, TextAlignment, WebContent, WidgetAlignment,
    WidgetAppearance, WidgetContentElement, WidgetLayoutStyle, WidgetMaterial, WidgetPosition,
    MAX_GRAPH_POINTS, MAX_WIDGET_HEIGHT, MAX_WIDGET_WIDTH,
};

/// Cap on any embedded binary or markup payload (animations, raw icon
/// images, web content): 5 MiB. Exceeding it is a validation failure, never
/// a silent truncation.
pub const MAX_EMBEDDED_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;
