//! Built-in fixture baseline.

use chrono::{DateTime, TimeZone, Utc};

use yiyf_core::constants::{DEFAULT_SOURCE_URL, SOURCE_DEFAULT};
use yiyf_core::types::{FixtureData, ProgramRecord};

fn baseline_timestamp() -> DateTime<Utc> {
    // 2025-09-10T00:00:00Z, when the list was last curated by hand.
    Utc.timestamp_opt(1_757_462_400, 0)
        .single()
        .unwrap_or_default()
}

/// The curated program list shipped with the server.
pub fn default_fixture() -> FixtureData {
    let programs = [
        (
            "수지청소년문화의집 수지맞은 베이킹교실 4차 활동",
            "2025-07-23 ~ 2025-08-01",
            "2025-08-02 ~ 2025-08-30",
        ),
        (
            "수지청소년문화의집 수지맞은 베이킹교실 3차 활동",
            "2025-06-19 ~ 2025-07-04",
            "2025-07-05 ~ 2025-07-26",
        ),
        (
            "유림청소년문화의집 청소년이 배우는 역사의 진실 청.사.진 활동공유",
            "2025-08-30 ~ 2025-09-13",
            "2025-08-30 ~ 2025-09-13",
        ),
        (
            "처인성어울림센터 아트살롱 1회차 활동",
            "2025-08-12 ~ 2025-08-19",
            "2025-09-06 ~ 2025-09-06",
        ),
        (
            "용인시청소년미래재단 동천청소년문화의집 개관식 사전접수",
            "2025-09-04 ~ 2025-09-24",
            "2025-09-29 ~ 2025-09-29",
        ),
        (
            "용인시청소년미래재단 동천청소년문화의집 청소년 운영위원회 1기 모집",
            "2025-09-09 ~ 2025-09-17",
            "2025-10-01 ~ 2025-12-31",
        ),
        (
            "청소년수련관 욕구조사 결과 공유",
            "2025-09-08 ~ 2025-09-25",
            "2025-09-08 ~ 2025-09-25",
        ),
        (
            "꿈드림 2025년 나+너=드림 멘토 모집 안내",
            "2025-09-08 ~ 마감시까지",
            "",
        ),
    ]
    .into_iter()
    .map(|(title, application, participation)| {
        ProgramRecord::new(title)
            .with_periods(application, participation)
            .with_link(DEFAULT_SOURCE_URL)
    })
    .collect();

    FixtureData {
        programs,
        last_updated: baseline_timestamp(),
        source: SOURCE_DEFAULT.into(),
    }
}
