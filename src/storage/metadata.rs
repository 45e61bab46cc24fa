//! Per-page metadata derived from a [`PackedLinks`]

use super::packed::PackedLinks;

/// Out-degrees and liveness of every page id below `id_limit`
///
/// Built once, before any score vector exists, and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphMetadata {
    id_limit: usize,
    out_degree: Vec<u32>,
    is_active: Vec<bool>,
    active_count: usize,
}

impl GraphMetadata {
    /// Derive metadata from the packed links
    ///
    /// One pass over the array collects out-degrees and incoming flags, a
    /// second pass over ids marks the active ones.
    #[must_use]
    pub fn new(links: &PackedLinks) -> Self {
        fn grow(id: u32, out_degree: &mut Vec<u32>, has_incoming: &mut Vec<bool>) {
            let needed = id as usize + 1;
            if needed > out_degree.len() {
                out_degree.resize(needed, 0);
                has_incoming.resize(needed, false);
            }
        }

        let mut out_degree: Vec<u32> = Vec::new();
        let mut has_incoming: Vec<bool> = Vec::new();

        for (dest, sources) in links.runs() {
            grow(dest, &mut out_degree, &mut has_incoming);
            has_incoming[dest as usize] = true;
            for &src in sources {
                grow(src, &mut out_degree, &mut has_incoming);
                out_degree[src as usize] += 1;
            }
        }

        let is_active: Vec<bool> = out_degree
            .iter()
            .zip(&has_incoming)
            .map(|(&degree, &incoming)| degree > 0 || incoming)
            .collect();
        let active_count = is_active.iter().filter(|&&active| active).count();

        Self {
            id_limit: out_degree.len(),
            out_degree,
            is_active,
            active_count,
        }
    }

    /// One past the largest page id in the graph
    #[must_use]
    pub const fn id_limit(&self) -> usize {
        self.id_limit
    }

    /// Number of active pages
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Outgoing link counts, indexed by page id
    #[must_use]
    pub fn out_degrees(&self) -> &[u32] {
        &self.out_degree
    }

    /// Liveness flags, indexed by page id
    #[must_use]
    pub fn active_flags(&self) -> &[bool] {
        &self.is_active
    }

    /// Outgoing link count of `id` (0 beyond `id_limit`)
    #[must_use]
    pub fn out_degree(&self, id: usize) -> u32 {
        self.out_degree.get(id).copied().unwrap_or(0)
    }

    /// Whether `id` has any incoming or outgoing link
    #[must_use]
    pub fn is_active(&self, id: usize) -> bool {
        self.is_active.get(id).copied().unwrap_or(false)
    }

    /// Active pages without outgoing links
    #[must_use]
    pub fn dangling_count(&self) -> usize {
        self.is_active
            .iter()
            .zip(&self.out_degree)
            .filter(|&(&active, &degree)| active && degree == 0)
            .count()
    }
}
