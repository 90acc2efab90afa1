// src/heatmap/index.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One day of publishing activity, as embedded in the page data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub count: u32,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
}

impl ActivityRecord {
    /// `(title, url)` pairs in record order. A title without a matching url
    /// links to an empty href.
    pub fn posts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.titles.iter().enumerate().map(|(i, title)| {
            let url = self.urls.get(i).map(String::as_str).unwrap_or("");
            (title.as_str(), url)
        })
    }
}

/// Date → record lookup, built once per render pass.
#[derive(Debug, Clone, Default)]
pub struct ContributionIndex {
    by_date: HashMap<NaiveDate, ActivityRecord>,
}

impl ContributionIndex {
    /// Later records replace earlier ones with the same date.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ActivityRecord>,
    {
        let mut by_date = HashMap::new();
        for record in records {
            let date = record.date;
            if by_date.insert(date, record).is_some() {
                debug!(%date, "duplicate heatmap record, keeping the later one");
            }
        }
        ContributionIndex { by_date }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ActivityRecord> {
        self.by_date.get(&date)
    }

    /// Lookup by `YYYY-MM-DD` key; malformed keys simply miss.
    pub fn get_str(&self, key: &str) -> Option<&ActivityRecord> {
        NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .ok()
            .and_then(|date| self.get(date))
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
