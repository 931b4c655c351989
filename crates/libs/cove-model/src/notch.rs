use crate::activity::Priority;
use crate::error::ValidationError;
use crate::leaf::ColorDescriptor;
use crate::widget::{WebContent, WidgetContentElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NotchSectionLayout {
    #[default]
    Stack,
    Metrics,
    Custom,
}

/// One titled group of elements inside a notch layout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotchSection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub layout: NotchSectionLayout,
    pub elements: Vec<WidgetContentElement>,
}

impl NotchSection {
    pub fn new(id: impl Into<String>, elements: Vec<WidgetContentElement>) -> Self {
        Self { id: id.into(), title: None, layout: NotchSectionLayout::Stack, elements }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_layout(mut self, layout: NotchSectionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty("notch section id"));
        }
        for element in &self.elements {
            element.validate()?;
        }
        Ok(())
    }
}

/// Expanded notch layout shown as a named tab in the Cove shell.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotchTabConfig {
    pub title: String,
    #[serde(default)]
    pub icon_symbol_name: Option<String>,
    pub preferred_height: f64,
    #[serde(default)]
    pub sections: Vec<NotchSection>,
    #[serde(default)]
    pub web_content: Option<WebContent>,
    #[serde(default)]
    pub allow_web_interaction: bool,
}

impl NotchTabConfig {
    pub fn new(title: impl Into<String>, preferred_height: f64) -> Self {
        Self {
            title: title.into(),
            icon_symbol_name: None,
            preferred_height,
            sections: Vec::new(),
            web_content: None,
            allow_web_interaction: false,
        }
    }

    pub fn with_icon_symbol(mut self, name: impl Into<String>) -> Self {
        self.icon_symbol_name = Some(name.into());
        self
    }

    pub fn with_sections(mut self, sections: Vec<NotchSection>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_web_content(mut self, content: WebContent) -> Self {
        self.web_content = Some(content);
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::empty("notch tab title"));
        }
        for section in &self.sections {
            section.validate()?;
        }
        if let Some(content) = &self.web_content {
            content.validate()?;
        }
        Ok(())
    }
}

/// Compact notch layout replacing the host's minimal presentation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotchMinimalisticConfig {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub sections: Vec<NotchSection>,
    #[serde(default)]
    pub web_content: Option<WebContent>,
    #[serde(default)]
    pub layout: NotchSectionLayout,
    #[serde(default)]
    pub hides_music_controls: bool,
}

impl NotchMinimalisticConfig {
    pub fn new() -> Self {
        Self {
            headline: None,
            subtitle: None,
            sections: Vec::new(),
            web_content: None,
            layout: NotchSectionLayout::Stack,
            hides_music_controls: false,
        }
    }

    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.headline = Some(headline.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_sections(mut self, sections: Vec<NotchSection>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_web_content(mut self, content: WebContent) -> Self {
        self.web_content = Some(content);
        self
    }

    pub fn with_layout(mut self, layout: NotchSectionLayout) -> Self {
        self.layout = layout;
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for section in &self.sections {
            section.validate()?;
        }
        if let Some(content) = &self.web_content {
            content.validate()?;
        }
        Ok(())
    }
}

impl Default for NotchMinimalisticConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fully specifies one notch experience: an optional expanded tab layout and
/// an optional minimalistic layout.
///
/// Validation is deliberately permissive about which layouts are present; a
/// descriptor with neither renders nothing, and judging that is the host's
/// burden.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NotchExperienceDescriptor {
    pub id: String,
    pub application_id: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub accent_color: ColorDescriptor,
    #[serde(default)]
    pub tab: Option<NotchTabConfig>,
    #[serde(default)]
    pub minimalistic: Option<NotchMinimalisticConfig>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl NotchExperienceDescriptor {
    pub fn new(id: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            application_id: application_id.into(),
            priority: Priority::Normal,
            accent_color: ColorDescriptor::Accent,
            tab: None,
            minimalistic: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_accent_color(mut self, color: ColorDescriptor) -> Self {
        self.accent_color = color;
        self
    }

    pub fn with_tab(mut self, tab: NotchTabConfig) -> Self {
        self.tab = Some(tab);
        self
    }

    pub fn with_minimalistic(mut self, config: NotchMinimalisticConfig) -> Self {
        self.minimalistic = Some(config);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::empty("experience id"));
        }
        if self.application_id.is_empty() {
            return Err(ValidationError::empty("application id"));
        }
        if let Some(tab) = &self.tab {
            tab.validate()?;
        }
        if let Some(minimalistic) = &self.minimalistic {
            minimalistic.validate()?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
