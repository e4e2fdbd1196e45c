//! Last-resort program list.
//!
//! Served only when the cache is cold and neither the scraper nor the fixture
//! store produced anything. Never adopted into the cache.

use chrono::{DateTime, Utc};

use yiyf_core::image::{ART_IMAGE, BAKING_IMAGE, READING_IMAGE};
use yiyf_core::types::ProgramRecord;

const SECOND_BAKING_IMAGE: &str =
    "https://images.unsplash.com/photo-1578985545062-69928b1d9587?w=400&h=200&fit=crop&crop=center";

/// Builds the hard-coded fallback list, normalized at `now`.
pub fn fallback_programs(now: DateTime<Utc>, source_root: &str) -> Vec<ProgramRecord> {
    vec![
        ProgramRecord::new("수지청소년문화의집 '수지맞은 베이킹교실 4차' 활동")
            .with_image(BAKING_IMAGE)
            .with_periods("2025-07-23 ~ 2025-08-01", "2025-08-02 ~ 2025-08-30"),
        ProgramRecord::new("수지청소년문화의집 '수지맞은 베이킹교실 3차' 활동")
            .with_image(SECOND_BAKING_IMAGE)
            .with_periods("2025-06-19 ~ 2025-07-04", "2025-07-05 ~ 2025-07-26"),
        ProgramRecord::new("유림청소년문화의집 청소년이 배우는 역사의 진실 '청.사.진' 활동공유")
            .with_image(READING_IMAGE)
            .with_periods("2025-08-30 ~ 2025-09-13", "2025-08-30 ~ 2025-09-13"),
        ProgramRecord::new("처인성어울림센터 아트살롱 1회차 활동")
            .with_image(ART_IMAGE)
            .with_periods("2025-08-12 ~ 2025-08-19", "2025-09-06 ~ 2025-09-06"),
    ]
    .into_iter()
    .map(|r| r.normalize(now, None, source_root))
    .collect()
}
