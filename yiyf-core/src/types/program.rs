//! Program records.
//!
//! A record is what the frontend renders as one card. Records reach the cache
//! from two places (the scraper and the fixture store) and are normalized the
//! same way regardless of where they came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_PERIOD;
use crate::error::{Result, YiyfError};
use crate::image::classify_image;

fn unknown_period() -> String {
    UNKNOWN_PERIOD.to_string()
}

/// One youth program announcement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    /// Announcement title
    pub title: String,
    /// Poster or stock image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `"YYYY-MM-DD ~ YYYY-MM-DD"`, free text, or [`UNKNOWN_PERIOD`]
    #[serde(default = "unknown_period")]
    pub application_period: String,
    /// Same shape as `application_period`, may be empty
    #[serde(default)]
    pub participation_period: String,
    /// Absolute URL of the announcement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// When this record was last normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    /// When the source reported this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<DateTime<Utc>>,
}

impl ProgramRecord {
    /// Creates a record with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
            application_period: unknown_period(),
            participation_period: String::new(),
            link: None,
            last_updated: None,
            scraped_at: None,
        }
    }

    /// Sets both periods.
    pub fn with_periods(
        mut self,
        application: impl Into<String>,
        participation: impl Into<String>,
    ) -> Self {
        self.application_period = application.into();
        self.participation_period = participation.into();
        self
    }

    /// Sets the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Sets the image.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Validates the record structure.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(YiyfError::ValidationError("program title is empty".into()));
        }
        Ok(())
    }

    /// Normalizes a raw record into its cached form.
    ///
    /// - `image` is kept when present, otherwise classified from the title
    /// - `link` falls back to `source_root`
    /// - `last_updated` becomes `now`
    /// - `scraped_at` is `reported_at`, else the record's own value, else `now`
    pub fn normalize(
        mut self,
        now: DateTime<Utc>,
        reported_at: Option<DateTime<Utc>>,
        source_root: &str,
    ) -> Self {
        self.title = self.title.trim().to_string();

        if self.image.as_deref().map_or(true, |i| i.trim().is_empty()) {
            self.image = Some(classify_image(&self.title).to_string());
        }
        if self.link.as_deref().map_or(true, |l| l.trim().is_empty()) {
            self.link = Some(source_root.to_string());
        }

        self.last_updated = Some(now);
        self.scraped_at = Some(reported_at.or(self.scraped_at).unwrap_or(now));
        self
    }

    /// Parses an untrusted JSON payload into validated records.
    ///
    /// The payload must be an array; every element must deserialize into a
    /// record with a non-empty title.
    pub fn list_from_value(value: &serde_json::Value) -> Result<Vec<ProgramRecord>> {
        let items = value
            .as_array()
            .ok_or_else(|| YiyfError::ValidationError("programs must be an array".into()))?;

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let record: ProgramRecord = serde_json::from_value(item.clone()).map_err(|e| {
                    YiyfError::ValidationError(format!("programs[{}] is not a program: {}", idx, e))
                })?;
                record.validate().map_err(|e| {
                    YiyfError::ValidationError(format!("programs[{}]: {}", idx, e))
                })?;
                Ok(record)
            })
            .collect()
    }
}
