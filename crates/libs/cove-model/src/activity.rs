use crate::content::{ProgressIndicator, TrailingContent};
use crate::error::ValidationError;
use crate::leaf::{ColorDescriptor, IconDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Relative importance of an entity; affects host-side slot arbitration and
/// layering, never client-side behavior.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// How the host renders the activity's center text region.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CenterTextStyle {
    /// Follow the user's Cove preference.
    #[default]
    InheritUser,
    Standard,
    Inline,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SneakPeekStyle {
    #[default]
    Standard,
    /// Superseded by `Standard` + `CenterTextStyle::InheritUser`; still
    /// accepted by the host.
    Inline,
}

/// Auto-reveal of title/subtitle when the entity is presented or updated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SneakPeekConfig {
    pub enabled: bool,
    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub style: Option<SneakPeekStyle>,
    #[serde(default)]
    pub show_on_update: bool,
}

impl SneakPeekConfig {
    pub fn standard(duration_secs: f64) -> Self {
        Self {
            enabled: true,
            duration_secs: Some(duration_secs),
            style: Some(SneakPeekStyle::Standard),
            show_on_update: true,
        }
    }
}

/// Fully specifies one live activity in the notch/pill region.
///
/// Immutable value: build it, present it, replace it wholesale on update.
/// `progress` is clamped to `[0, 1]` by the constructors rather than
/// rejected; dimension violations elsewhere are validation failures.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LiveActivityDescriptor {
    pub id: String,
    pub application_id: String,
    #[serde(default)]
    pub priority: Priority,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub leading_icon: IconDescriptor,
    #[serde(default)]
    pub badge_icon: Option<IconDescriptor>,
    /// Replaces the leading icon when present; must be leading-compatible
    /// content (icon or animation).
    #[serde(default)]
    pub leading_content_override: Option<TrailingContent>,
    #[serde(default)]
    pub trailing_content: TrailingContent,
    #[serde(default)]
    pub progress_indicator: Option<ProgressIndicator>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub accent_color: ColorDescriptor,
    /// When false the host treats the slot as exclusive and may preempt
    /// concurrently-playing media. Advisory; never checked client-side.
    #[serde(default)]
    pub allows_music_coexistence: bool,
    /// Advisory duration for host-side auto-dismissal planning; `None` means
    /// the activity persists until dismissed.
    #[serde(default)]
    pub estimated_duration_ms: Option<u64>,
    #[serde(default)]
    pub center_text_style: CenterTextStyle,
    #[serde(default)]
    pub sneak_peek: Option<SneakPeekConfig>,
    #[serde(default)]
    pub sneak_peek_title: Option<String>,
    #[serde(default)]
    pub sneak_peek_subtitle: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl LiveActivityDescriptor {
    pub fn new(
        id: impl Into<String>,
        application_id: impl Into<String>,
        title: impl Into<String>,
        leading_icon: IconDescriptor,
    ) -> Self {
        Self {
            id: id.into(),
            application_id: application_id.into(),
            priority: Priority::Normal,
            title: title.into(),
            subtitle: None,
            leading_icon,
            badge_icon: None,
            leading_content_override: None,
            trailing_content: TrailingContent::None,
            progress_indicator: None,
            progress: 0.0,
            accent_color: ColorDescriptor::Accent,
            allows_music_coexistence: false,
            estimated_duration_ms: None,
            center_text_style: CenterTextStyle::InheritUser,
            sneak_peek: None,
            sneak_peek_title: None,
            sneak_peek_subtitle: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_badge_icon(mut self, icon: IconDescriptor) -> Self {
        self.badge_icon = Some(icon);
        self
    }

    pub fn with_leading_content_override(mut self, content: TrailingContent) -> Self {
        self.leading_content_override = Some(content);
        self
    }

    pub fn with_trailing_content(mut self, content: TrailingContent) -> Self {
        self.trailing_content = content;
        self
    }

    pub fn with_progress_indicator(mut self, indicator: ProgressIndicator) -> Self {
        self.progress_indicator = Some(indicator);
        self
    }

    /// Sets the progress value, clamped to `[0, 1]`. Out-of-range input is
    /// never a validation failure.
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self
    }

    pub fn with_accent_color(mut self, color: ColorDescriptor) -> Self {
        self.accent_color = color;
        self
    }

    pub fn with_music_coexistence(mut self, allowed: bool) -> Self {
        self.allows_music_coexistence = allowed;
        self
    }

    pub fn with_estimated_duration(mut self, duration: Duration) -> Self {
        self.estimated_duration_ms = Some(duration.as_millis() as u64);
        self
    }

    pub fn with_center_text_style(mut self, style: CenterTextStyle) -> Self {
        self.center_text_style = style;
        self
    }

    pub fn with_sneak_peek(mut self, config: SneakPeekConfig) -> Self {
        self.sneak_peek = Some(config);
        self
    }

    pub fn with_sneak_peek_text(
        mut self,
        title: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        self.sneak_peek_title = Some(title.into());
        self.sneak_peek_subtitle = Some(subtitle.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sneak-peek title, falling back to the activity title.
    pub fn effective_sneak_peek_title(&self) -> &str {
        self.sneak_peek_title.as_deref().unwrap_or(&self.title)
    }

    /// Sneak-peek subtitle, falling back to the activity subtitle.
    pub fn effective_sneak_peek_subtitle(&self) -> Option<&str> {
        self.sneak_peek_subtitle.as_deref().or(self.subtitle.as_deref())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty("activity id"));
        }
        if self.application_id.is_empty() {
            return Err(ValidationError::empty("application id"));
        }
        if self.title.is_empty() {
            return Err(ValidationError::empty("activity title"));
        }
        self.leading_icon.validate()?;
        if let Some(badge) = &self.badge_icon {
            badge.validate()?;
        }
        self.trailing_content.validate()?;
        if let Some(indicator) = &self.progress_indicator {
            indicator.validate()?;
        }
        if let Some(override_content) = &self.leading_content_override {
            override_content.validate()?;
            if !override_content.is_leading_compatible() {
                return Err(ValidationError::LeadingOverrideNotCompatible);
            }
        }
        if !(0.0..=1.0).contains(&self.progress) {
            return Err(ValidationError::out_of_range(
                "progress",
                format!("{} not within [0, 1]", self.progress),
            ));
        }
        // At most one of trailing content and a renderable indicator may
        // occupy the trailing slot.
        let indicator_renderable =
            self.progress_indicator.as_ref().is_some_and(ProgressIndicator::is_renderable);
        if indicator_renderable && !self.trailing_content.is_none() {
            return Err(ValidationError::TrailingProgressConflict);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LiveActivityDescriptor {
        LiveActivityDescriptor::new(
            "activity.download",
            "com.example.sample",
            "Downloading",
            IconDescriptor::symbol("arrow.down.circle.fill"),
        )
    }

    #[test]
    fn progress_is_clamped_at_construction_never_rejected() {
        assert_eq!(sample().with_progress(1.7).progress, 1.0);
        assert_eq!(sample().with_progress(-0.3).progress, 0.0);
        assert_eq!(sample().with_progress(0.35).progress, 0.35);
        assert!(sample().with_progress(42.0).is_valid());
    }

    #[test]
    fn empty_identity_fields_fail_validation() {
        let mut descriptor = sample();
        descriptor.id.clear();
        assert_eq!(descriptor.validate(), Err(ValidationError::empty("activity id")));

        let mut descriptor = sample();
        descriptor.application_id.clear();
        assert_eq!(descriptor.validate(), Err(ValidationError::empty("application id")));

        let mut descriptor = sample();
        descriptor.title.clear();
        assert_eq!(descriptor.validate(), Err(ValidationError::empty("activity title")));
    }

    #[test]
    fn renderable_indicator_excludes_trailing_content() {
        let conflicting = sample()
            .with_trailing_content(TrailingContent::text("47%"))
            .with_progress_indicator(ProgressIndicator::ring());
        assert_eq!(conflicting.validate(), Err(ValidationError::TrailingProgressConflict));

        // Either side alone is fine.
        assert!(sample().with_progress_indicator(ProgressIndicator::ring()).is_valid());
        assert!(sample().with_trailing_content(TrailingContent::text("47%")).is_valid());
    }

    #[test]
    fn none_indicator_coexists_with_trailing_content() {
        let descriptor = sample()
            .with_trailing_content(TrailingContent::text("LIVE"))
            .with_progress_indicator(ProgressIndicator::None);
        assert!(descriptor.is_valid());
    }

    #[test]
    fn leading_override_restricted_to_icon_and_animation() {
        let ok = sample()
            .with_leading_content_override(TrailingContent::icon(IconDescriptor::symbol("timer")));
        assert!(ok.is_valid());

        let bad = sample().with_leading_content_override(TrailingContent::text("nope"));
        assert_eq!(bad.validate(), Err(ValidationError::LeadingOverrideNotCompatible));
    }

    #[test]
    fn music_coexistence_flag_is_advisory() {
        assert!(sample().with_music_coexistence(false).is_valid());
        assert!(sample().with_music_coexistence(true).is_valid());
    }

    #[test]
    fn sneak_peek_text_falls_back_to_title_and_subtitle() {
        let plain = sample().with_subtitle("update-pkg-v2.dmg");
        assert_eq!(plain.effective_sneak_peek_title(), "Downloading");
        assert_eq!(plain.effective_sneak_peek_subtitle(), Some("update-pkg-v2.dmg"));

        let overridden = plain.with_sneak_peek_text("Download", "35% complete");
        assert_eq!(overridden.effective_sneak_peek_title(), "Download");
        assert_eq!(overridden.effective_sneak_peek_subtitle(), Some("35% complete"));
    }

    #[test]
    fn invalid_badge_icon_invalidates_the_descriptor() {
        let descriptor = sample().with_badge_icon(IconDescriptor::symbol(""));
        assert!(!descriptor.is_valid());
    }
}
