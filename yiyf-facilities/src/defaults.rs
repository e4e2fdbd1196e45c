//! Facilities seeded into an empty store.

use yiyf_core::types::Facility;

/// The rooms every youth center starts with.
pub fn default_facilities() -> Vec<Facility> {
    vec![
        Facility::new("cooking-room", "요리실습실", 16).with_description("베이킹 및 요리 프로그램 공간"),
        Facility::new("dance-studio", "댄스연습실", 20).with_description("거울과 음향 장비가 있는 연습실"),
        Facility::new("music-room", "음악실", 10).with_description("밴드 합주 및 개인 연습"),
        Facility::new("seminar-room", "세미나실", 30).with_description("강의, 회의, 동아리 활동"),
        Facility::new("study-room", "자치활동실", 12),
    ]
}
