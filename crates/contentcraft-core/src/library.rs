//! Content library queries and statistics.
//!
//! Pure functions over an already tenant-scoped content collection: brand
//! filtering, text search, preset-name categories, history ordering and the
//! dashboard/analytics aggregates.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::BrandId;
use crate::models::content::{Content, OutputType};

/// Library tabs, matched against the preset name snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryCategory {
    #[default]
    All,
    Youtube,
    Blog,
    Social,
    Marketing,
}

impl LibraryCategory {
    pub const ALL: [LibraryCategory; 5] = [
        Self::All,
        Self::Youtube,
        Self::Blog,
        Self::Social,
        Self::Marketing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Content",
            Self::Youtube => "YouTube",
            Self::Blog => "Blog Posts",
            Self::Social => "Social Media",
            Self::Marketing => "Marketing",
        }
    }

    fn keyword(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Youtube => Some("youtube"),
            Self::Blog => Some("blog"),
            Self::Social => Some("social"),
            Self::Marketing => Some("marketing"),
        }
    }

    pub fn matches(self, content: &Content) -> bool {
        self.keyword()
            .is_none_or(|kw| content.preset.to_lowercase().contains(kw))
    }
}

/// Filter applied to a content collection before display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Only content generated under this brand.
    pub brand_id: Option<BrandId>,
    /// Case-insensitive match against the input text and the preset name.
    pub search: Option<String>,
    pub category: LibraryCategory,
}

impl ContentQuery {
    pub fn for_brand(brand_id: Option<BrandId>) -> Self {
        Self {
            brand_id,
            ..Self::default()
        }
    }

    pub fn matches(&self, content: &Content) -> bool {
        if let Some(brand) = self.brand_id
            && content.brand_id != Some(brand)
        {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = content.input.to_lowercase().contains(&needle)
                || content.preset.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        self.category.matches(content)
    }
}

/// Matching content, most recent first.
pub fn history<'a>(contents: &'a [Content], query: &ContentQuery) -> Vec<&'a Content> {
    let mut matched: Vec<&Content> = contents.iter().filter(|c| query.matches(c)).collect();
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    matched
}

pub fn recent<'a>(contents: &'a [Content], query: &ContentQuery, limit: usize) -> Vec<&'a Content> {
    let mut items = history(contents, query);
    items.truncate(limit);
    items
}

/// Number of items per library tab.
pub fn category_counts(contents: &[Content]) -> Vec<(LibraryCategory, usize)> {
    LibraryCategory::ALL
        .into_iter()
        .map(|cat| (cat, contents.iter().filter(|c| cat.matches(c)).count()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStats {
    pub total: usize,
    /// Items created within the stats window.
    pub in_window: usize,
    pub total_words: u64,
    pub average_words: u64,
}

/// Totals over `contents`. A window reaching past the earliest
/// representable date covers everything.
pub fn stats(contents: &[Content], now: DateTime<Utc>, window_days: u32) -> ContentStats {
    let since = now.checked_sub_days(Days::new(u64::from(window_days)));
    let total = contents.len();
    let total_words: u64 = contents.iter().map(|c| u64::from(c.word_count)).sum();
    ContentStats {
        total,
        in_window: contents
            .iter()
            .filter(|c| since.is_none_or(|since| c.created_at >= since))
            .count(),
        total_words,
        average_words: if total == 0 {
            0
        } else {
            // Rounded to nearest.
            (total_words + total as u64 / 2) / total as u64
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub content: usize,
    pub words: u64,
}

/// One entry per calendar day (UTC) for the last `days` days, oldest first,
/// ending with the day of `now`.
pub fn daily_activity(contents: &[Content], now: DateTime<Utc>, days: u32) -> Vec<DailyActivity> {
    let today = now.date_naive();
    (0..u64::from(days))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let day: Vec<&Content> = contents
                .iter()
                .filter(|c| c.created_at.date_naive() == date)
                .collect();
            DailyActivity {
                date,
                content: day.len(),
                words: day.iter().map(|c| u64::from(c.word_count)).sum(),
            }
        })
        .collect()
}

/// How many content records include each output type, most frequent first.
pub fn output_distribution(contents: &[Content]) -> Vec<(OutputType, usize)> {
    let mut counts: BTreeMap<OutputType, usize> = BTreeMap::new();
    for content in contents {
        for ty in content.outputs.keys() {
            *counts.entry(*ty).or_default() += 1;
        }
    }
    let mut out: Vec<(OutputType, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    out
}
