//! Preset domain model.
//!
//! A preset is a named prompt template. System presets (`is_custom = false`)
//! have no tenant, are visible to every tenant and can be neither edited nor
//! deleted. Custom presets belong to exactly one tenant.

use serde::{Deserialize, Serialize};

use super::ids::{PresetId, TenantId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Comprehensive,
    Youtube,
    Blog,
    Social,
    Technical,
    Marketing,
    Podcast,
    Ecommerce,
    Newsletter,
    Webinar,
    Corporate,
    Startup,
    Healthcare,
    Finance,
    Nonprofit,
    Local,
    #[serde(other)]
    Other,
}

impl PresetCategory {
    pub const ALL: [PresetCategory; 17] = [
        Self::Comprehensive,
        Self::Youtube,
        Self::Blog,
        Self::Social,
        Self::Technical,
        Self::Marketing,
        Self::Podcast,
        Self::Ecommerce,
        Self::Newsletter,
        Self::Webinar,
        Self::Corporate,
        Self::Startup,
        Self::Healthcare,
        Self::Finance,
        Self::Nonprofit,
        Self::Local,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Youtube => "youtube",
            Self::Blog => "blog",
            Self::Social => "social",
            Self::Technical => "technical",
            Self::Marketing => "marketing",
            Self::Podcast => "podcast",
            Self::Ecommerce => "ecommerce",
            Self::Newsletter => "newsletter",
            Self::Webinar => "webinar",
            Self::Corporate => "corporate",
            Self::Startup => "startup",
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
            Self::Nonprofit => "nonprofit",
            Self::Local => "local",
            Self::Other => "other",
        }
    }

    /// Parses a stored tag. Unknown tags map to [`PresetCategory::Other`].
    pub fn parse(tag: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(tag.trim()))
            .unwrap_or(Self::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub description: String,
    /// Prompt template applied to the source input.
    pub prompt: String,
    pub category: PresetCategory,
    /// `None` for system presets.
    pub tenant_id: Option<TenantId>,
    pub is_custom: bool,
    pub suggested: bool,
}

impl Preset {
    pub fn is_system(&self) -> bool {
        !self.is_custom
    }
}

/// Fields required to create a custom preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePreset {
    /// Required; custom presets always belong to a tenant.
    pub tenant_id: Option<TenantId>,
    pub name: String,
    pub description: String,
    pub prompt: String,
    pub category: PresetCategory,
    pub suggested: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdatePreset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    pub category: Option<PresetCategory>,
    pub suggested: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_parses_as_other() {
        assert_eq!(PresetCategory::parse("YouTube"), PresetCategory::Youtube);
        assert_eq!(PresetCategory::parse("gardening"), PresetCategory::Other);
    }

    #[test]
    fn unknown_category_deserializes_as_other() {
        let cat: PresetCategory = serde_json::from_str("\"gardening\"").unwrap();
        assert_eq!(cat, PresetCategory::Other);
    }
}
