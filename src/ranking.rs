//! Reporting on score vectors
//!
//! Top-N listings and per-iteration change ratios for progress output, and
//! ordering an arbitrary list of titles by precomputed scores.

use crate::storage::{PageId, PageTitles};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io::{self, Write};

/// The `n` highest-scoring page ids, best first
///
/// Ties are broken by ascending id.
#[must_use]
pub fn top_pages(scores: &[f64], n: usize) -> Vec<(PageId, f64)> {
    let mut ranked: Vec<(PageId, f64)> = scores
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score > 0.0)
        .filter_map(|(id, &score)| u32::try_from(id).ok().map(|id| (PageId(id), score)))
        .collect();

    let by_score = |a: &(PageId, f64), b: &(PageId, f64)| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0));
    if n < ranked.len() {
        ranked.select_nth_unstable_by(n, by_score);
        ranked.truncate(n);
    }
    ranked.sort_unstable_by(by_score);
    ranked
}

/// Smallest and largest `current / previous` over ids nonzero in both
///
/// `None` if no id is nonzero in both vectors.
#[must_use]
pub fn change_ratio_range(previous: &[f64], current: &[f64]) -> Option<(f64, f64)> {
    previous
        .iter()
        .zip(current)
        .filter(|&(&prev, &cur)| prev != 0.0 && cur != 0.0)
        .map(|(&prev, &cur)| cur / prev)
        .fold(None, |range, ratio| match range {
            None => Some((ratio, ratio)),
            Some((min, max)) => Some((f64::min(min, ratio), f64::max(max, ratio))),
        })
}

/// A title with its score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTitle {
    /// Page title as given
    pub title: String,
    /// Raw `PageRank` score
    pub score: f64,
}

impl RankedTitle {
    /// `log10` of the score, the scale used in reports
    #[must_use]
    pub fn log_score(&self) -> f64 {
        self.score.log10()
    }

    /// Highest score first, then title ascending
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.title.cmp(&other.title))
    }
}

/// Result of ordering a title list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedTitles {
    /// Known titles, best first
    pub entries: Vec<RankedTitle>,
    /// Titles listed more than once (later copies dropped)
    pub duplicates: Vec<String>,
    /// Titles with no page id
    pub missing: Vec<String>,
}

impl SortedTitles {
    /// Write one `"{log10 score:.3}\t{title}"` line per entry
    ///
    /// # Errors
    ///
    /// Propagates write failures
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{:.3}\t{}", entry.log_score(), entry.title)?;
        }
        out.flush()
    }
}

/// Order `titles` by score, highest first
///
/// Ids beyond the end of `scores` score 0.
pub fn sort_titles<I, S>(titles: I, pages: &PageTitles, scores: &[f64]) -> SortedTitles
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut sorted = SortedTitles::default();

    for title in titles {
        let title = title.into();
        if seen.contains(&title) {
            sorted.duplicates.push(title);
            continue;
        }
        let Some(id) = pages.id_of(&title) else {
            sorted.missing.push(title);
            continue;
        };
        seen.insert(title.clone());
        let score = scores.get(id.0 as usize).copied().unwrap_or(0.0);
        sorted.entries.push(RankedTitle { title, score });
    }

    sorted.entries.sort_by(RankedTitle::rank_cmp);
    sorted
}
