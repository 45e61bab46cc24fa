//! Page title ↔ page id map

use super::packed::PageId;
use std::collections::HashMap;

/// Bidirectional map between article titles and page ids
///
/// Titles are stored the way the dump stores them (underscores, no
/// namespace prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTitles {
    id_by_title: HashMap<String, PageId>,
    title_by_id: HashMap<PageId, String>,
}

impl PageTitles {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a page, replacing any earlier mapping of either the id or the title
    pub fn insert(&mut self, id: PageId, title: String) {
        if let Some(old_title) = self.title_by_id.remove(&id) {
            self.id_by_title.remove(&old_title);
        }
        if let Some(old_id) = self.id_by_title.remove(&title) {
            self.title_by_id.remove(&old_id);
        }
        self.id_by_title.insert(title.clone(), id);
        self.title_by_id.insert(id, title);
    }

    /// Id of a title
    #[must_use]
    pub fn id_of(&self, title: &str) -> Option<PageId> {
        self.id_by_title.get(title).copied()
    }

    /// Title of an id
    #[must_use]
    pub fn title_of(&self, id: PageId) -> Option<&str> {
        self.title_by_id.get(&id).map(String::as_str)
    }

    /// Number of pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.title_by_id.len()
    }

    /// True when no page is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title_by_id.is_empty()
    }

    /// All `(id, title)` pairs in ascending id order
    #[must_use]
    pub fn sorted_by_id(&self) -> Vec<(PageId, &str)> {
        let mut pages: Vec<_> = self
            .title_by_id
            .iter()
            .map(|(&id, title)| (id, title.as_str()))
            .collect();
        pages.sort_unstable_by_key(|&(id, _)| id);
        pages
    }
}

impl FromIterator<(PageId, String)> for PageTitles {
    fn from_iter<I: IntoIterator<Item = (PageId, String)>>(iter: I) -> Self {
        let mut titles = Self::new();
        for (id, title) in iter {
            titles.insert(id, title);
        }
        titles
    }
}
