//! Title → image classification.
//!
//! A program without a real image gets a stock image picked by keywords in its
//! title. The table is ordered and the first matching row wins, so a title that
//! mentions both baking and education is a baking program.

/// Baking and cooking programs.
pub const BAKING_IMAGE: &str =
    "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?w=400&h=200&fit=crop&crop=center";
/// Art classes and salons.
pub const ART_IMAGE: &str =
    "https://images.unsplash.com/photo-1541961017774-22349e4a1262?w=400&h=200&fit=crop&crop=center";
/// General youth activities. Also the default.
pub const YOUTH_ACTIVITY_IMAGE: &str =
    "https://images.unsplash.com/photo-1529156069898-49953e39b3ac?w=400&h=200&fit=crop&crop=center";
/// Education and classroom programs.
pub const EDUCATION_IMAGE: &str =
    "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=400&h=200&fit=crop&crop=center";
/// Culture, performances and exhibitions.
pub const CULTURE_IMAGE: &str =
    "https://images.unsplash.com/photo-1516450360452-9312f5e86fc7?w=400&h=200&fit=crop&crop=center";
/// Sports and play.
pub const SPORTS_IMAGE: &str =
    "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=200&fit=crop&crop=center";
/// Science, technology, robotics, coding.
pub const SCIENCE_IMAGE: &str =
    "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400&h=200&fit=crop&crop=center";
/// Reading and literature.
pub const READING_IMAGE: &str =
    "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=400&h=200&fit=crop&crop=center";

/// Image used when no keyword row matches.
pub const DEFAULT_IMAGE: &str = YOUTH_ACTIVITY_IMAGE;

/// Ordered keyword table. Row order is part of the contract.
pub const IMAGE_TABLE: &[(&[&str], &str)] = &[
    (&["베이킹", "쿠킹", "요리"], BAKING_IMAGE),
    (&["아트", "미술", "그림", "살롱"], ART_IMAGE),
    (&["청소년", "청.사.진", "활동", "체험"], YOUTH_ACTIVITY_IMAGE),
    (&["교육", "학습", "수업", "교실"], EDUCATION_IMAGE),
    (&["문화", "예술", "공연", "전시"], CULTURE_IMAGE),
    (&["스포츠", "운동", "체육", "놀이"], SPORTS_IMAGE),
    (&["과학", "기술", "로봇", "코딩"], SCIENCE_IMAGE),
    (&["독서", "문학", "책", "도서"], READING_IMAGE),
];

/// Picks the stock image for a program title.
pub fn classify_image(title: &str) -> &'static str {
    let title = title.to_lowercase();

    IMAGE_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, image)| *image)
        .unwrap_or(DEFAULT_IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("수지청소년문화의집 수지맞은 베이킹교실 4차 활동", BAKING_IMAGE ; "baking beats youth and education")]
    #[test_case("처인성어울림센터 아트살롱 1회차 활동", ART_IMAGE ; "art salon")]
    #[test_case("유림청소년문화의집 청소년이 배우는 역사의 진실 청.사.진 활동공유", YOUTH_ACTIVITY_IMAGE ; "youth")]
    #[test_case("진로 교육 특강", EDUCATION_IMAGE ; "education")]
    #[test_case("가을 공연 관람", CULTURE_IMAGE ; "culture")]
    #[test_case("주말 체육 교실", EDUCATION_IMAGE ; "education row precedes sports row")]
    #[test_case("로봇 코딩 캠프", SCIENCE_IMAGE ; "science")]
    #[test_case("함께 읽는 독서 모임", READING_IMAGE ; "reading")]
    #[test_case("꿈드림 2025년 나+너=드림 멘토 모집 안내", DEFAULT_IMAGE ; "no keyword falls back to default")]
    fn test_classification_table(title: &str, expected: &str) {
        assert_eq!(classify_image(title), expected);
    }

    #[test]
    fn test_baking_and_education_resolves_to_baking() {
        assert_eq!(classify_image("베이킹 교육"), BAKING_IMAGE);
        assert_eq!(classify_image("교육 베이킹"), BAKING_IMAGE);
    }

    #[test]
    fn test_empty_title_uses_default() {
        assert_eq!(classify_image(""), DEFAULT_IMAGE);
    }

    proptest! {
        #[test]
        fn prop_classification_is_pure(title in "\\PC{0,40}") {
            prop_assert_eq!(classify_image(&title), classify_image(&title));
        }

        #[test]
        fn prop_result_is_a_table_image(title in "\\PC{0,40}") {
            let image = classify_image(&title);
            prop_assert!(image == DEFAULT_IMAGE || IMAGE_TABLE.iter().any(|(_, i)| *i == image));
        }
    }
}
