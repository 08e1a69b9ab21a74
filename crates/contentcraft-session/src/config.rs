//! Session configuration.

use contentcraft_core::models::content::OutputType;
use serde::Deserialize;

/// Configuration for the content studio and library views.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Output types preselected for a new generation.
    pub default_output_types: Vec<OutputType>,
    /// Number of items on the dashboard's recent list (default: 6).
    pub recent_content_limit: usize,
    /// Window for the "this week" statistic, in days (default: 7).
    pub stats_window_days: u32,
    /// Length of the daily activity series, in days (default: 7).
    pub activity_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_output_types: vec![
                OutputType::YoutubeDescription,
                OutputType::BlogPost,
                OutputType::SeoTags,
            ],
            recent_content_limit: 6,
            stats_window_days: 7,
            activity_days: 7,
        }
    }
}
