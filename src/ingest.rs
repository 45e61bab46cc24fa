//! Turn dump rows into a title map and packed links
//!
//! Only the article namespace (0) is kept. Expected leading columns:
//!
//! - `page`: `page_id`, `page_namespace`, `page_title`, ...
//! - `pagelinks`: `pl_from`, `pl_namespace`, `pl_title`, ...
//!
//! Trailing columns vary between dump versions and are ignored.

use crate::error::{Error, Result};
use crate::sql::{InsertReader, Value};
use crate::storage::{PackedLinks, PageId, PageTitles};
use std::io::BufRead;

/// Namespace of ordinary articles
pub const ARTICLE_NAMESPACE: i64 = 0;

/// Relation holding page metadata
pub const PAGE_TABLE: &str = "page";

/// Relation holding page links
pub const PAGE_LINKS_TABLE: &str = "pagelinks";

/// Counters from one pass over the `pagelinks` dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Rows seen
    pub rows: usize,
    /// Rows turned into edges
    pub kept: usize,
    /// Rows outside the article namespace
    pub other_namespace: usize,
    /// Rows whose source id has no title
    pub unknown_source: usize,
    /// Rows whose target title has no id
    pub unknown_target: usize,
}

/// Build the title map from a `page` table dump
///
/// # Errors
///
/// Propagates parse and I/O errors; [`Error::UnexpectedRow`] for a row
/// whose first three columns are not (integer, integer, text).
pub fn read_page_titles<R: BufRead>(input: R) -> Result<PageTitles> {
    let mut reader = InsertReader::new(input, PAGE_TABLE);
    let mut titles = PageTitles::new();

    while let Some(tuples) = reader.read_insertion_tuples()? {
        for row in tuples {
            let (id, namespace, title) = leading_columns(PAGE_TABLE, &row)?;
            if namespace == ARTICLE_NAMESPACE {
                titles.insert(page_id(PAGE_TABLE, id)?, title.to_string());
            }
        }
    }

    log::debug!(
        "`{PAGE_TABLE}`: {} statements, {} article titles",
        reader.statements(),
        titles.len()
    );
    Ok(titles)
}

/// Build packed links from a `pagelinks` table dump
///
/// Links whose source or target is not in `titles` are dropped and counted.
///
/// # Errors
///
/// Propagates parse and I/O errors; [`Error::UnexpectedRow`] for a row
/// whose first three columns are not (integer, integer, text).
pub fn read_page_links<R: BufRead>(input: R, titles: &PageTitles) -> Result<(PackedLinks, LinkStats)> {
    let mut reader = InsertReader::new(input, PAGE_LINKS_TABLE);
    let mut stats = LinkStats::default();
    let mut edges = Vec::new();

    while let Some(tuples) = reader.read_insertion_tuples()? {
        for row in tuples {
            stats.rows += 1;
            let (from, namespace, title) = leading_columns(PAGE_LINKS_TABLE, &row)?;
            if namespace != ARTICLE_NAMESPACE {
                stats.other_namespace += 1;
                continue;
            }
            let src = page_id(PAGE_LINKS_TABLE, from)?;
            if titles.title_of(src).is_none() {
                stats.unknown_source += 1;
                continue;
            }
            let Some(dst) = titles.id_of(title) else {
                stats.unknown_target += 1;
                continue;
            };
            edges.push((src, dst));
            stats.kept += 1;
        }
    }

    log::debug!(
        "`{PAGE_LINKS_TABLE}`: {} statements, {stats:?}",
        reader.statements()
    );
    Ok((PackedLinks::from_edges(edges), stats))
}

fn leading_columns<'r>(table: &str, row: &'r [Value]) -> Result<(i64, i64, &'r str)> {
    match row {
        [Value::Int(id), Value::Int(namespace), Value::Text(title), ..] => {
            Ok((*id, *namespace, title.as_str()))
        }
        _ => Err(Error::UnexpectedRow {
            table: table.to_string(),
            reason: format!("expected (integer, integer, text, ...) but got {row:?}"),
        }),
    }
}

fn page_id(table: &str, id: i64) -> Result<PageId> {
    u32::try_from(id).map(PageId).map_err(|_| Error::UnexpectedRow {
        table: table.to_string(),
        reason: format!("page id {id} does not fit in 32 bits"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PAGE_SQL: &str = "\
-- page dump
INSERT INTO `page` VALUES (1,0,'Main_Page','',0,0),(2,0,'Tokyo','',0,0),(3,1,'Tokyo','',0,0);
INSERT INTO `page` VALUES (5,0,'Kyoto','',0,0);
";

    const LINKS_SQL: &str = "\
INSERT INTO `pagelinks` VALUES (1,0,'Tokyo',0),(1,0,'Kyoto',0),(2,0,'Kyoto',0);
INSERT INTO `pagelinks` VALUES (5,0,'Osaka',0),(9,0,'Tokyo',0),(3,1,'Tokyo',1),(5,0,'Main_Page',0);
";

    #[test]
    fn test_read_page_titles() {
        let titles = read_page_titles(Cursor::new(PAGE_SQL)).unwrap();

        assert_eq!(titles.len(), 3);
        assert_eq!(titles.id_of("Tokyo"), Some(PageId(2)));
        assert_eq!(titles.title_of(PageId(3)), None);
        assert_eq!(titles.title_of(PageId(5)), Some("Kyoto"));
    }

    #[test]
    fn test_read_page_links() {
        let titles = read_page_titles(Cursor::new(PAGE_SQL)).unwrap();
        let (links, stats) = read_page_links(Cursor::new(LINKS_SQL), &titles).unwrap();

        // 5 → 1; 1 → 2; 1 → 5, 2 → 5
        assert_eq!(links.as_slice(), &[1, 1, 5, 2, 1, 1, 5, 2, 1, 2]);
        assert_eq!(
            stats,
            LinkStats {
                rows: 7,
                kept: 4,
                other_namespace: 1,
                unknown_source: 1,
                unknown_target: 1,
            }
        );
    }

    #[test]
    fn test_unexpected_row_shape() {
        let sql = "INSERT INTO `page` VALUES (1,'0','Main_Page');\n";
        let err = read_page_titles(Cursor::new(sql)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedRow { .. }));
    }

    #[test]
    fn test_negative_page_id() {
        let sql = "INSERT INTO `page` VALUES (-4,0,'Broken');\n";
        assert!(matches!(
            read_page_titles(Cursor::new(sql)),
            Err(Error::UnexpectedRow { .. })
        ));
    }

    #[test]
    fn test_syntax_error_propagates() {
        let sql = "INSERT INTO `pagelinks` VALUES (1,0,'Tokyo';\n";
        let err = read_page_links(Cursor::new(sql), &PageTitles::new()).unwrap_err();
        assert!(err.is_syntax());
    }
}
