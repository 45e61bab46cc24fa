//! Run-length packed adjacency (incoming links grouped by destination)
//!
//! # Format
//!
//! ```text
//! Graph: 0 → 2, 1 → 2, 2 → 0
//!
//! Packed:
//!   [0, 1, 2,   2, 2, 0, 1]
//!    │  │  └ sources of 0
//!    │  └ incoming count
//!    └ destination        (run for 2: dest 2, count 2, sources 0 and 1)
//! ```
//!
//! Pages without incoming links have no run. Runs carry no separators, so a
//! single corrupt count shifts every later run; [`PackedLinks::new`] therefore
//! validates the whole array before anything reads it.

use crate::error::{Error, Result};

/// Page identifier (zero-indexed, as in the dump's `page_id` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

/// Validated packed link array
///
/// Immutable once built; the solver borrows it for the whole run.
///
/// # Example
///
/// ```
/// use wiki_pagerank::{PackedLinks, PageId};
///
/// let links = PackedLinks::from_edges([(PageId(0), PageId(2)), (PageId(1), PageId(2))]);
/// assert_eq!(links.as_slice(), &[2, 2, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedLinks {
    links: Vec<u32>,
    num_runs: usize,
}

impl PackedLinks {
    /// Validate a raw packed array
    ///
    /// # Errors
    ///
    /// [`Error::MalformedLinks`] if a run header is cut off, a run declares
    /// zero sources, a declared count reads past the end of the array, or a
    /// destination has more than one run.
    pub fn new(links: Vec<u32>) -> Result<Self> {
        let mut offset = 0;
        let mut num_runs = 0;
        let mut max_dest = 0_u32;

        while offset < links.len() {
            let Some(&count) = links.get(offset + 1) else {
                return Err(Error::malformed(offset, "run header is truncated"));
            };
            if count == 0 {
                return Err(Error::malformed(offset, "run declares zero incoming links"));
            }
            let remaining = links.len() - offset - 2;
            if count as usize > remaining {
                return Err(Error::malformed(
                    offset,
                    format!("run declares {count} incoming links but only {remaining} values remain"),
                ));
            }
            max_dest = max_dest.max(links[offset]);
            num_runs += 1;
            offset += 2 + count as usize;
        }

        let packed = Self { links, num_runs };
        if num_runs > 0 {
            packed.check_unique_destinations(max_dest as usize + 1)?;
        }
        Ok(packed)
    }

    fn check_unique_destinations(&self, limit: usize) -> Result<()> {
        let mut seen = vec![false; limit];
        let mut offset = 0;
        for (dest, sources) in self.runs() {
            let slot = &mut seen[dest as usize];
            if *slot {
                return Err(Error::malformed(
                    offset,
                    format!("destination {dest} has more than one run"),
                ));
            }
            *slot = true;
            offset += 2 + sources.len();
        }
        Ok(())
    }

    /// Pack `(source, destination)` edges
    ///
    /// Runs come out in ascending destination order with ascending sources.
    /// Repeated edges collapse into one.
    #[must_use]
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (PageId, PageId)>,
    {
        // (dst, src) so sorting groups by destination
        let mut pairs: Vec<(u32, u32)> = edges.into_iter().map(|(src, dst)| (dst.0, src.0)).collect();
        pairs.sort_unstable();
        pairs.dedup();

        let mut links = Vec::with_capacity(pairs.len() * 2);
        let mut num_runs = 0;
        let mut count_slot = 0;
        let mut current = None;

        for (dst, src) in pairs {
            if current != Some(dst) {
                links.push(dst);
                links.push(0);
                count_slot = links.len() - 1;
                current = Some(dst);
                num_runs += 1;
            }
            links.push(src);
            links[count_slot] += 1;
        }

        Self { links, num_runs }
    }

    /// Iterate runs as `(destination, sources)`
    #[must_use]
    pub fn runs(&self) -> Runs<'_> {
        Runs { rest: &self.links }
    }

    /// Number of runs (pages with at least one incoming link)
    #[must_use]
    pub const fn num_runs(&self) -> usize {
        self.num_runs
    }

    /// Number of links (sum of all incoming counts)
    #[must_use]
    pub fn num_links(&self) -> usize {
        self.links.len() - 2 * self.num_runs
    }

    /// True when there are no runs at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Raw packed integers
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.links
    }

    /// Take the raw packed integers
    #[must_use]
    pub fn into_inner(self) -> Vec<u32> {
        self.links
    }
}

/// Iterator over the runs of a [`PackedLinks`]
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    rest: &'a [u32],
}

impl<'a> Iterator for Runs<'a> {
    type Item = (u32, &'a [u32]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&dest, tail) = self.rest.split_first()?;
        let (&count, tail) = tail.split_first()?;
        let (sources, tail) = tail.split_at(count as usize);
        self.rest = tail;
        Some((dest, sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_offset(links: Vec<u32>) -> usize {
        match PackedLinks::new(links) {
            Err(Error::MalformedLinks { offset, .. }) => offset,
            other => panic!("expected malformed links, got {other:?}"),
        }
    }

    #[test]
    fn test_empty() {
        let links = PackedLinks::new(Vec::new()).unwrap();
        assert!(links.is_empty());
        assert_eq!(links.num_runs(), 0);
        assert_eq!(links.num_links(), 0);
        assert_eq!(links.runs().count(), 0);
    }

    #[test]
    fn test_valid_runs() {
        let links = PackedLinks::new(vec![0, 1, 2, 2, 2, 0, 1]).unwrap();
        assert_eq!(links.num_runs(), 2);
        assert_eq!(links.num_links(), 3);

        let runs: Vec<_> = links.runs().collect();
        assert_eq!(runs, vec![(0, &[2][..]), (2, &[0, 1][..])]);
    }

    #[test]
    fn test_overrun_is_rejected() {
        assert_eq!(malformed_offset(vec![1, 3, 0, 2]), 0);
        assert_eq!(malformed_offset(vec![1, 1, 0, 2, 5, 0]), 3);
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        assert_eq!(malformed_offset(vec![7]), 0);
        assert_eq!(malformed_offset(vec![1, 1, 0, 4]), 3);
    }

    #[test]
    fn test_zero_count_is_rejected() {
        assert_eq!(malformed_offset(vec![1, 0]), 0);
    }

    #[test]
    fn test_duplicate_destination_is_rejected() {
        assert_eq!(malformed_offset(vec![1, 1, 0, 2, 1, 3, 1, 1, 4]), 6);
    }

    #[test]
    fn test_from_edges_groups_by_destination() {
        // Star: 1, 2, 3 → 0 plus chain 0 → 4
        let edges = [
            (PageId(3), PageId(0)),
            (PageId(1), PageId(0)),
            (PageId(0), PageId(4)),
            (PageId(2), PageId(0)),
        ];
        let links = PackedLinks::from_edges(edges);
        assert_eq!(links.as_slice(), &[0, 3, 1, 2, 3, 4, 1, 0]);
        assert_eq!(links.num_runs(), 2);

        // Re-validating the builder's output must succeed
        let again = PackedLinks::new(links.clone().into_inner()).unwrap();
        assert_eq!(again, links);
    }

    #[test]
    fn test_from_edges_dedups() {
        let links = PackedLinks::from_edges([
            (PageId(0), PageId(1)),
            (PageId(0), PageId(1)),
            (PageId(1), PageId(1)),
        ]);
        assert_eq!(links.as_slice(), &[1, 2, 0, 1]);
    }

    #[test]
    fn test_from_edges_empty() {
        let links = PackedLinks::from_edges(std::iter::empty());
        assert!(links.is_empty());
    }
}
