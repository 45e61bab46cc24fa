//! Integration tests for wiki-pagerank
//!
//! Runs the whole path from dump text to sorted titles over temp files

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use wiki_pagerank::config::{Config, PathsConfig};
use wiki_pagerank::sql::{InsertReader, Value};
use wiki_pagerank::storage::read_scores;
use wiki_pagerank::{pipeline, Error, PackedLinks, PageId, Pagerank};

const PAGE_SQL: &str = "\
-- MySQL dump 10.13  Distrib 5.5.41, for debian-linux-gnu (x86_64)
--
-- Host: 10.64.16.27    Database: jawiki

/*!40101 SET NAMES utf8 */;
DROP TABLE IF EXISTS `page`;
LOCK TABLES `page` WRITE;
INSERT INTO `page` VALUES (1,0,'Hub','',0,0,0,0.5,'20150512000000',NULL,1,10,'wikitext'),(2,0,'Spoke_A','',0,0,0,0.1,'20150512000000',NULL,2,20,'wikitext');
INSERT INTO `page` VALUES (3,0,'Spoke_B','',0,0,0,0.2,'20150512000000',NULL,3,30,'wikitext'),(4,0,'Dead_End','',0,0,0,0.3,'20150512000000',NULL,4,40,NULL),(5,1,'Hub','',0,0,0,0.4,'20150512000000',NULL,5,50,NULL);
UNLOCK TABLES;
";

const LINKS_SQL: &str = "\
-- pagelinks
INSERT INTO `pagelinks` VALUES (2,0,'Hub',0),(3,0,'Hub',0),(1,0,'Spoke_A',0),(1,0,'Dead_End',0);
INSERT INTO `pagelinks` VALUES (3,0,'Nonexistent',0),(5,0,'Hub',1),(1,1,'Hub',0);
";

fn write_config(dir: &Path) -> Config {
    std::fs::write(dir.join("page.sql"), PAGE_SQL).unwrap();
    std::fs::write(dir.join("pagelinks.sql"), LINKS_SQL).unwrap();
    Config {
        tolerance: Some(1e-12),
        paths: PathsConfig {
            page_sql: dir.join("page.sql"),
            page_links_sql: dir.join("pagelinks.sql"),
            titles_cache: dir.join("titles.parquet"),
            links_cache: dir.join("links.raw"),
            scores: dir.join("scores.raw"),
        },
        ..Config::default()
    }
}

fn write_gzip(path: &Path, text: &str) {
    let mut encoder = GzEncoder::new(std::fs::File::create(path).unwrap(), Compression::best());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn test_reader_over_dump() {
    let mut reader = InsertReader::new(PAGE_SQL.as_bytes(), "page");

    let first = reader.read_insertion_tuples().unwrap().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0][7], Value::Float(0.5));
    assert!(first[0][9].is_null());

    let second = reader.read_insertion_tuples().unwrap().unwrap();
    assert_eq!(second[2][2], Value::from("Hub"));
    assert!(reader.read_insertion_tuples().unwrap().is_none());
}

#[tokio::test]
async fn test_full_run_and_caches() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    let scores = pipeline::run(&config).await.unwrap();

    // Hub(1) ← Spoke_A(2), Spoke_B(3); Hub → Spoke_A, Dead_End(4)
    assert_eq!(scores.len(), 5);
    assert!(scores[0].abs() < f64::EPSILON);
    assert!((scores.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!(scores[1] > scores[2]);
    assert!(scores[2] > scores[3]);
    assert!(scores[4] > scores[3]);

    assert!(config.paths.links_cache.is_file());
    assert_eq!(read_scores(&config.paths.scores).await.unwrap(), scores);

    // Second run must come from the caches alone
    std::fs::remove_file(&config.paths.page_links_sql).unwrap();
    #[cfg(feature = "storage")]
    std::fs::remove_file(&config.paths.page_sql).unwrap();
    let again = pipeline::run(&config).await.unwrap();
    assert_eq!(again, scores);
}

#[tokio::test]
async fn test_run_over_gzipped_dumps() {
    let plain_dir = tempdir().unwrap();
    let expected = pipeline::run(&write_config(plain_dir.path())).await.unwrap();

    let dir = tempdir().unwrap();
    let mut config = write_config(dir.path());
    config.paths.page_sql = dir.path().join("page.sql.gz");
    config.paths.page_links_sql = dir.path().join("pagelinks.sql.gz");
    write_gzip(&config.paths.page_sql, PAGE_SQL);
    write_gzip(&config.paths.page_links_sql, LINKS_SQL);

    let scores = pipeline::run(&config).await.unwrap();
    assert_eq!(scores, expected);
}

#[cfg(feature = "storage")]
#[tokio::test]
async fn test_sort_requires_title_cache() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("titles.txt");
    std::fs::write(&input, "Hub\n").unwrap();

    let err = pipeline::sort_title_file(&config, &input, &dir.path().join("sorted.txt"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("run `compute` first"));
    // The dump is not parsed as a fallback
    assert!(!config.paths.titles_cache.exists());
}

#[tokio::test]
async fn test_sort_titles_file() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());
    pipeline::run(&config).await.unwrap();

    let input = dir.path().join("titles.txt");
    let output = dir.path().join("sorted.txt");
    std::fs::write(&input, "Spoke_B\nHub\nMissing_Page\nDead_End\nHub\n").unwrap();

    let sorted = pipeline::sort_title_file(&config, &input, &output).await.unwrap();
    assert_eq!(sorted.duplicates, vec!["Hub".to_string()]);
    assert_eq!(sorted.missing, vec!["Missing_Page".to_string()]);

    let text = std::fs::read_to_string(&output).unwrap();
    let titles: Vec<_> = text
        .lines()
        .map(|line| line.split('\t').nth(1).unwrap())
        .collect();
    assert_eq!(titles, vec!["Hub", "Dead_End", "Spoke_B"]);
}

#[tokio::test]
async fn test_corrupt_links_cache_is_reported() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path());

    // dest 3 declares two sources but only one follows
    std::fs::write(&config.paths.links_cache, [0_u8, 0, 0, 3, 0, 0, 0, 2, 0, 0, 0, 1]).unwrap();
    let err = pipeline::run(&config).await.unwrap_err();
    let root = err.root_cause().downcast_ref::<Error>();
    assert!(matches!(root, Some(Error::MalformedLinks { offset: 0, .. })));
}

#[test]
fn test_packed_links_feed_solver() {
    let links = PackedLinks::new(vec![1, 2, 0, 2, 2, 1, 1]).unwrap();
    let mut pr = Pagerank::new(&links).unwrap();
    assert_eq!(pr.metadata().active_count(), 3);
    assert_eq!(pr.metadata().dangling_count(), 0);

    for _ in 0..100 {
        pr.iterate(wiki_pagerank::Damping::default());
    }
    let scores = pr.scores();
    assert!(scores[1] > scores[0]);
    assert!(scores[1] > scores[2]);

    // Same graph through the edge builder
    let rebuilt = PackedLinks::from_edges([
        (PageId(0), PageId(1)),
        (PageId(2), PageId(1)),
        (PageId(1), PageId(2)),
    ]);
    assert_eq!(rebuilt, links);
}
