//! Keyword heuristic for spotting program announcements in arbitrary HTML.
//!
//! The foundation site has no stable markup for its listings, so extraction is
//! deliberately loose: look at list items, table rows and links, keep the ones
//! whose text reads like a program announcement, and pull dates, links and
//! images out of them.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use yiyf_core::constants::{
    DEFAULT_MAX_PROGRAMS, MAX_CANDIDATE_CHARS, MIN_CANDIDATE_CHARS, UNKNOWN_PERIOD,
};
use yiyf_core::types::ProgramRecord;

/// Sections that usually hold listings. Tried first.
static SECTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"[id*="program"], [class*="program"], [id*="notice"], [class*="notice"],
           [id*="board"], [class*="board"], [id*="news"], [class*="news"],
           [id*="list"], [class*="list"]"#,
    )
    .expect("section selector is valid")
});

static CANDIDATE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li, tr, a").expect("candidate selector is valid"));

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[src]").expect("image selector is valid"));

/// `2025-07-23`, `2025.07.23`, `2025/7/23`.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})[.\-/]\s?(\d{1,2})[.\-/]\s?(\d{1,2})").expect("date regex is valid")
});

/// A date range or a lone date, including the separator.
static DATE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}[.\-/]\s?\d{1,2}[.\-/]\s?\d{1,2}\.?(\s*[~∼\-]\s*)?")
        .expect("date span regex is valid")
});

/// Program vocabulary. A candidate needs at least one of these.
pub const DEFAULT_INCLUDE: &[&str] = &[
    "프로그램", "모집", "활동", "교실", "체험", "캠프", "참가", "참여", "동아리", "봉사",
    "교육", "축제", "강좌", "특강", "멘토", "베이킹", "아트", "공연", "전시", "접수",
];

/// Administrative and navigation vocabulary. A candidate must have none.
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "로그인", "회원가입", "개인정보", "이용약관", "사이트맵", "오시는 길", "오시는길",
    "채용", "입찰", "계약", "예산", "결산", "경영공시", "정보공개", "바로가기",
    "저작권", "copyright", "합격자", "면접",
];

/// Turns a page into raw program records.
///
/// Implementations must be pure: same HTML and base URL, same output.
pub trait ExtractStrategy: Send + Sync {
    /// Extracts candidate programs from `html`; relative URLs resolve against `base`.
    fn extract(&self, html: &str, base: &Url) -> Vec<ProgramRecord>;
}

/// Keyword-based extraction with a section-first, whole-page-second search.
#[derive(Clone, Debug)]
pub struct KeywordHeuristic {
    /// Positive keywords
    pub include: Vec<String>,
    /// Exclusion keywords
    pub exclude: Vec<String>,
    /// Result cap
    pub max_programs: usize,
}

impl Default for KeywordHeuristic {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            max_programs: DEFAULT_MAX_PROGRAMS,
        }
    }
}

impl KeywordHeuristic {
    /// Default keywords with a custom cap.
    pub fn with_max_programs(max_programs: usize) -> Self {
        Self {
            max_programs,
            ..Self::default()
        }
    }

    /// Returns true if `text` reads like a program announcement.
    pub fn qualifies(&self, text: &str) -> bool {
        let len = text.chars().count();
        if len <= MIN_CANDIDATE_CHARS || len >= MAX_CANDIDATE_CHARS {
            return false;
        }

        let lower = text.to_lowercase();
        self.include.iter().any(|k| lower.contains(k.as_str()))
            && !self.exclude.iter().any(|k| lower.contains(k.as_str()))
    }

    fn scan<'a>(
        &self,
        candidates: impl Iterator<Item = ElementRef<'a>>,
        base: &Url,
    ) -> Vec<ProgramRecord> {
        let mut seen = HashSet::new();
        let mut accepted = HashSet::new();
        let mut records = Vec::new();

        for element in candidates {
            if records.len() >= self.max_programs {
                break;
            }

            // Anything inside an accepted row or item belongs to that record.
            if element.ancestors().any(|node| accepted.contains(&node.id())) {
                continue;
            }

            let text = element_text(element);
            if !self.qualifies(&text) {
                continue;
            }
            accepted.insert(element.id());

            let record = self.candidate_record(element, &text, base);
            if seen.insert(record.title.clone()) {
                records.push(record);
            }
        }

        records
    }

    /// Builds a record from a qualifying candidate. Dates come from the whole
    /// candidate; a row or item with a qualifying link takes its title from
    /// that link so label and author cells stay out of it.
    fn candidate_record(&self, element: ElementRef<'_>, text: &str, base: &Url) -> ProgramRecord {
        let anchor = if element.value().name() == "a" {
            Some((element, text.to_string()))
        } else {
            element
                .select(&ANCHOR)
                .map(|a| (a, element_text(a)))
                .find(|(_, anchor_text)| self.qualifies(anchor_text))
        };

        let dates: Vec<String> = DATE
            .captures_iter(text)
            .filter_map(|c| {
                let year: u32 = c[1].parse().ok()?;
                let month: u32 = c[2].parse().ok()?;
                let day: u32 = c[3].parse().ok()?;
                Some(format!("{:04}-{:02}-{:02}", year, month, day))
            })
            .collect();

        let application = match dates.get(0..2) {
            Some([start, end]) => format!("{} ~ {}", start, end),
            _ => UNKNOWN_PERIOD.to_string(),
        };
        let participation = match dates.get(2..4) {
            Some([start, end]) => format!("{} ~ {}", start, end),
            _ => String::new(),
        };

        let title_source = anchor.as_ref().map_or(text, |(_, anchor_text)| anchor_text.as_str());
        let title = match collapse_whitespace(&DATE_SPAN.replace_all(title_source, " ")) {
            stripped if stripped.is_empty() => title_source.to_string(),
            stripped => stripped,
        };

        let href = match &anchor {
            Some((a, _)) => a.value().attr("href"),
            None => element
                .select(&ANCHOR)
                .next()
                .and_then(|a| a.value().attr("href")),
        };
        let src = element
            .select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"));

        let mut record = ProgramRecord::new(title).with_periods(application, participation);
        record.link = href.and_then(|h| resolve(base, h));
        record.image = src.and_then(|s| resolve(base, s));
        record
    }
}

impl ExtractStrategy for KeywordHeuristic {
    fn extract(&self, html: &str, base: &Url) -> Vec<ProgramRecord> {
        let document = Html::parse_document(html);

        let in_sections = document
            .select(&SECTION)
            .flat_map(|section| section.select(&CANDIDATE));
        let records = self.scan(in_sections, base);
        if !records.is_empty() {
            debug!(count = records.len(), "Programs found in listing sections");
            return records;
        }

        let records = self.scan(document.select(&CANDIDATE), base);
        debug!(count = records.len(), "Programs found by whole-page scan");
        records
    }
}

fn resolve(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty()
        || reference.starts_with('#')
        || reference.to_ascii_lowercase().starts_with("javascript:")
    {
        return None;
    }
    base.join(reference).ok().map(String::from)
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
