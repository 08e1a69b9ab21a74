//! Content domain model.
//!
//! A content record is the persisted result of one generation run. It is
//! immutable once created; only deletion is allowed.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BrandId, ContentId, TenantId};

/// Kinds of derived artifact a generation run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    YoutubeDescription,
    BlogPost,
    ForumPost,
    SeoTags,
    Timestamps,
    VoiceAnalysis,
    SocialPosts,
    EmailNewsletter,
}

impl OutputType {
    pub const ALL: [OutputType; 8] = [
        Self::YoutubeDescription,
        Self::BlogPost,
        Self::ForumPost,
        Self::SeoTags,
        Self::Timestamps,
        Self::VoiceAnalysis,
        Self::SocialPosts,
        Self::EmailNewsletter,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::YoutubeDescription => "youtube_description",
            Self::BlogPost => "blog_post",
            Self::ForumPost => "forum_post",
            Self::SeoTags => "seo_tags",
            Self::Timestamps => "timestamps",
            Self::VoiceAnalysis => "voice_analysis",
            Self::SocialPosts => "social_posts",
            Self::EmailNewsletter => "email_newsletter",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::YoutubeDescription => "YouTube Description",
            Self::BlogPost => "Blog Post",
            Self::ForumPost => "Forum Post",
            Self::SeoTags => "SEO Tags",
            Self::Timestamps => "Timestamps",
            Self::VoiceAnalysis => "Voice Analysis",
            Self::SocialPosts => "Social Media Posts",
            Self::EmailNewsletter => "Email Newsletter",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub input: String,
    /// Display name of the preset at generation time. Not a live reference.
    pub preset: String,
    /// Brands are not cascaded on delete, so this may point at a brand
    /// that no longer exists.
    pub brand_id: Option<BrandId>,
    pub tenant_id: Option<TenantId>,
    pub output_count: u32,
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
    pub outputs: BTreeMap<OutputType, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContent {
    pub tenant_id: TenantId,
    pub brand_id: Option<BrandId>,
    pub input: String,
    pub preset: String,
    pub outputs: BTreeMap<OutputType, String>,
    /// Defaults to the number of outputs.
    pub output_count: Option<u32>,
    /// Defaults to the total word count across all outputs.
    pub word_count: Option<u32>,
}

pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

pub fn total_words(outputs: &BTreeMap<OutputType, String>) -> u32 {
    outputs.values().map(|text| count_words(text)).sum()
}
