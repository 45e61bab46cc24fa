//! `PageRank` power iteration over packed incoming links
//!
//! Based on Page et al. (1999) "The `PageRank` Citation Ranking: Bringing Order to the Web"
//!
//! Each step reads the current score vector only and writes a separate next
//! vector; the two are swapped when the step ends.
//!
//! ```text
//! PR'(u) = d * Σ PR(v) / outdegree(v)  +  d * Σ_dangling PR(w) / N  +  (1-d) / N
//!            v → u
//! ```
//!
//! Where `N` is the number of active pages. Dangling mass is spread over all
//! active pages (dangling ones included), so the scores keep summing to 1.

use crate::error::{Error, Result};
use crate::storage::{GraphMetadata, PackedLinks};

/// Damping factor in (0, 1]
///
/// The probability mass that follows links each step; the rest teleports
/// uniformly.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Damping(f64);

impl Damping {
    /// Google standard
    pub const STANDARD: f64 = 0.85;

    /// Validate a damping factor
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDamping`] unless `0 < value <= 1`.
    pub fn new(value: f64) -> Result<Self> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(Error::InvalidDamping(value))
        }
    }

    /// The raw factor
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Damping {
    fn default() -> Self {
        Self(Self::STANDARD)
    }
}

impl TryFrom<f64> for Damping {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

/// Iterative `PageRank` solver
///
/// Construction puts every active page at `1 / active_count`; each call to
/// [`Pagerank::iterate`] performs one power step. Convergence is up to the
/// caller (see [`pagerank`] for a driver that stops on an L1 threshold).
///
/// # Example
///
/// ```
/// use wiki_pagerank::{Damping, PackedLinks, PageId, Pagerank};
///
/// // 0 → 1 → 2 → 0
/// let links = PackedLinks::from_edges([
///     (PageId(0), PageId(1)),
///     (PageId(1), PageId(2)),
///     (PageId(2), PageId(0)),
/// ]);
/// let mut pr = Pagerank::new(&links).unwrap();
/// for _ in 0..10 {
///     pr.iterate(Damping::default());
/// }
/// assert!(pr.scores().iter().all(|s| (s - 1.0 / 3.0).abs() < 1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct Pagerank<'a> {
    links: &'a PackedLinks,
    meta: GraphMetadata,
    scores: Vec<f64>,
    next: Vec<f64>,
    share: Vec<f64>,
    iterations: usize,
}

impl<'a> Pagerank<'a> {
    /// Build metadata and the uniform starting distribution
    ///
    /// # Errors
    ///
    /// [`Error::NoActivePages`] if no page has any link.
    #[allow(clippy::cast_precision_loss)] // 2^52 pages is far beyond any wiki
    pub fn new(links: &'a PackedLinks) -> Result<Self> {
        let meta = GraphMetadata::new(links);
        if meta.active_count() == 0 {
            return Err(Error::NoActivePages);
        }

        let n = meta.id_limit();
        let init = 1.0 / meta.active_count() as f64;
        let scores = meta
            .active_flags()
            .iter()
            .map(|&active| if active { init } else { 0.0 })
            .collect();

        Ok(Self {
            links,
            meta,
            scores,
            next: vec![0.0; n],
            share: vec![0.0; n],
            iterations: 0,
        })
    }

    /// One power-iteration step
    #[allow(clippy::cast_precision_loss)]
    pub fn iterate(&mut self, damping: Damping) {
        let d = damping.value();
        let active_count = self.meta.active_count() as f64;
        let degrees = self.meta.out_degrees();
        let active = self.meta.active_flags();

        // Rank each page sends along every one of its links
        for ((share, &score), &degree) in self.share.iter_mut().zip(&self.scores).zip(degrees) {
            *share = if degree > 0 {
                score / f64::from(degree)
            } else {
                0.0
            };
        }

        self.next.fill(0.0);
        for (dest, sources) in self.links.runs() {
            self.next[dest as usize] = sources.iter().map(|&src| self.share[src as usize]).sum();
        }

        let dangling: f64 = self
            .scores
            .iter()
            .zip(degrees)
            .zip(active)
            .filter(|&((_, &degree), &is_active)| is_active && degree == 0)
            .map(|((&score, _), _)| score)
            .sum::<f64>()
            / active_count;

        // Teleport and dangling redistribution are uniform, so fold them once
        let addend = dangling * d + (1.0 - d) / active_count;
        for (next, &is_active) in self.next.iter_mut().zip(active) {
            *next = if is_active { *next * d + addend } else { 0.0 };
        }

        std::mem::swap(&mut self.scores, &mut self.next);
        self.iterations += 1;
    }

    /// Iterate until one step moves the scores by less than `tolerance`
    /// (L1), or `max_iterations` steps have run
    ///
    /// `on_step` sees the solver after each step, the scores before it, and
    /// the step's L1 delta. Returns true if the tolerance was met.
    pub fn iterate_until<F>(
        &mut self,
        damping: Damping,
        max_iterations: usize,
        tolerance: Option<f64>,
        mut on_step: F,
    ) -> bool
    where
        F: FnMut(&Self, &[f64], f64),
    {
        let mut prev = self.scores.clone();
        for _ in 0..max_iterations {
            self.iterate(damping);
            let delta = l1_delta(&prev, &self.scores);
            on_step(&*self, &prev, delta);
            if tolerance.is_some_and(|tolerance| delta < tolerance) {
                log::debug!(
                    "PageRank converged after {} iterations (delta={delta:.2e})",
                    self.iterations
                );
                return true;
            }
            prev.copy_from_slice(&self.scores);
        }
        false
    }

    /// Current scores, indexed by page id (0 for inactive ids)
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Take the score vector
    #[must_use]
    pub fn into_scores(self) -> Vec<f64> {
        self.scores
    }

    /// Metadata the solver was built from
    #[must_use]
    pub const fn metadata(&self) -> &GraphMetadata {
        &self.meta
    }

    /// Steps taken so far
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Sum of scores over active pages (1 up to rounding)
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }
}

/// L1 distance between two score vectors of equal length
#[must_use]
pub fn l1_delta(prev: &[f64], next: &[f64]) -> f64 {
    prev.iter().zip(next).map(|(a, b)| (a - b).abs()).sum()
}

/// Compute `PageRank` scores for every page id in the graph
///
/// Iterates until the L1 change of one step drops below `tolerance` or
/// `max_iterations` steps have run.
///
/// # Errors
///
/// [`Error::NoActivePages`] if the graph has no links.
///
/// # Example
///
/// ```
/// use wiki_pagerank::{pagerank, Damping, PackedLinks, PageId};
///
/// // 0 → 1, 1 has no outgoing links
/// let links = PackedLinks::from_edges([(PageId(0), PageId(1))]);
/// let scores = pagerank(&links, Damping::default(), 100, 1e-12).unwrap();
/// assert!(scores[1] > scores[0]);
/// assert!((scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// ```
pub fn pagerank(
    links: &PackedLinks,
    damping: Damping,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>> {
    let mut pr = Pagerank::new(links)?;
    pr.iterate_until(damping, max_iterations, Some(tolerance), |_, _, _| {});
    Ok(pr.into_scores())
}
