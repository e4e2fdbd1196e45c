//! # YIYF Scraper
//!
//! Pulls program announcements off the foundation's public site.
//!
//! [`HtmlScraper`] does the HTTP work and implements
//! [`ProgramSource`](yiyf_core::traits::ProgramSource); the extraction itself
//! sits behind [`ExtractStrategy`] so it can be tested against canned pages.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
mod heuristic;

pub use client::{HtmlScraper, ScraperConfig};
pub use heuristic::{ExtractStrategy, KeywordHeuristic, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
