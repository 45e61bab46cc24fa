//! End-to-end runs: dumps or caches in, score file out
//!
//! Each loader prefers its cache and falls back to parsing the dump, writing
//! the cache afterwards so the next run skips the parse.

use crate::algorithms::Pagerank;
use crate::config::Config;
use crate::ingest;
use crate::ranking::{change_ratio_range, sort_titles, top_pages, SortedTitles};
use crate::storage::{read_scores, write_scores, PackedLinks, PageTitles};
use anyhow::{bail, Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

/// Dump lines run to megabytes; read them in large chunks
const DUMP_BUFFER_BYTES: usize = 1 << 20;

/// Open a dump for line reading, decompressing `*.gz` on the fly
///
/// Dumps may hold several concatenated gzip members.
fn open_dump(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::with_capacity(
            DUMP_BUFFER_BYTES,
            MultiGzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(DUMP_BUFFER_BYTES, file)))
    }
}

/// Title map from the cache, or from the `page` dump
///
/// # Errors
///
/// Returns error if neither source can be read or the dump is malformed
pub async fn load_titles(config: &Config) -> Result<PageTitles> {
    #[cfg(feature = "storage")]
    {
        let cache = &config.paths.titles_cache;
        if cache.is_file() {
            log::info!("Reading title cache {}", cache.display());
            return PageTitles::read_parquet(cache).await;
        }
    }

    let dump = &config.paths.page_sql;
    log::info!("Parsing {}", dump.display());
    let start = Instant::now();
    let titles = ingest::read_page_titles(open_dump(dump)?)
        .with_context(|| format!("Failed to parse {}", dump.display()))?;
    log::info!(
        "Read {} article titles in {:.1} s",
        titles.len(),
        start.elapsed().as_secs_f64()
    );

    #[cfg(feature = "storage")]
    {
        titles.write_parquet(&config.paths.titles_cache).await?;
        log::info!("Wrote title cache {}", config.paths.titles_cache.display());
    }

    Ok(titles)
}

/// Packed links from the cache, or from the `pagelinks` dump
///
/// # Errors
///
/// Returns error if neither source can be read, the dump is malformed, or
/// the cache fails validation
pub async fn load_links(config: &Config, titles: &PageTitles) -> Result<PackedLinks> {
    let cache = &config.paths.links_cache;
    if cache.is_file() {
        log::info!("Reading links cache {}", cache.display());
        return PackedLinks::read_raw(cache).await;
    }

    let dump = &config.paths.page_links_sql;
    log::info!("Parsing {}", dump.display());
    let start = Instant::now();
    let (links, stats) = ingest::read_page_links(open_dump(dump)?, titles)
        .with_context(|| format!("Failed to parse {}", dump.display()))?;
    log::info!(
        "Read {} links into {} runs in {:.1} s",
        links.num_links(),
        links.num_runs(),
        start.elapsed().as_secs_f64()
    );
    if stats.unknown_source + stats.unknown_target > 0 {
        log::warn!(
            "Skipped {} links from unknown pages and {} links to unknown titles",
            stats.unknown_source,
            stats.unknown_target
        );
    }

    links.write_raw(cache).await?;
    log::info!("Wrote links cache {}", cache.display());
    Ok(links)
}

/// Iterate `PageRank` as configured, logging progress after each step
///
/// # Errors
///
/// Returns error if the damping factor is invalid or the graph has no
/// active pages
pub fn compute(config: &Config, titles: &PageTitles, links: &PackedLinks) -> Result<Vec<f64>> {
    let damping = config.damping()?;
    let mut pr = Pagerank::new(links)?;

    let meta = pr.metadata();
    log::info!(
        "Computing PageRank: {} active pages ({} dangling), {} links, id limit {}",
        meta.active_count(),
        meta.dangling_count(),
        links.num_links(),
        meta.id_limit()
    );

    let mut start = Instant::now();
    let converged = pr.iterate_until(
        damping,
        config.max_iterations,
        config.tolerance,
        |pr, prev, delta| {
            log::info!(
                "Iteration {} ({:.3} s, delta={delta:.2e})",
                pr.iterations() - 1,
                start.elapsed().as_secs_f64()
            );

            if let Some((min, max)) = change_ratio_range(prev, pr.scores()) {
                log::debug!("Range of ratio of changes: {min} to {max}");
            }
            if log::log_enabled!(log::Level::Debug) {
                for (id, score) in top_pages(pr.scores(), config.report_top) {
                    log::debug!("  {:.2}  {}", score.log10(), titles.title_of(id).unwrap_or("?"));
                }
            }
            start = Instant::now();
        },
    );
    if converged {
        log::info!("Converged after {} iterations", pr.iterations());
    }

    Ok(pr.into_scores())
}

/// Load everything, compute, and write the score file
///
/// # Errors
///
/// Propagates any loading, computation or write failure
pub async fn run(config: &Config) -> Result<Vec<f64>> {
    let titles = load_titles(config).await?;
    let links = load_links(config, &titles).await?;
    let scores = compute(config, &titles, &links)?;

    write_scores(&scores, &config.paths.scores).await?;
    log::info!("Wrote {} scores to {}", scores.len(), config.paths.scores.display());
    Ok(scores)
}

/// Title map for sorting: the cache written by [`run`], never the dump
#[cfg(feature = "storage")]
async fn cached_titles(config: &Config) -> Result<PageTitles> {
    let cache = &config.paths.titles_cache;
    if !cache.is_file() {
        bail!(
            "Title cache {} not found; run `compute` first",
            cache.display()
        );
    }
    PageTitles::read_parquet(cache).await
}

/// Without the Parquet cache the title map can only come from the dump
#[cfg(not(feature = "storage"))]
async fn cached_titles(config: &Config) -> Result<PageTitles> {
    load_titles(config).await
}

/// Sort the titles listed in `input` (one per line) by the stored scores
///
/// Writes `"{log10 score:.3}\t{title}"` lines to `output`, best first. Reads
/// the title cache and score file left by [`run`].
///
/// # Errors
///
/// Returns error if the title cache or score file is missing, or the input
/// or output cannot be read or written
pub async fn sort_title_file(config: &Config, input: &Path, output: &Path) -> Result<SortedTitles> {
    let titles = cached_titles(config).await?;
    let scores = read_scores(&config.paths.scores).await?;

    let reader = BufReader::new(
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?,
    );
    let lines = reader
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let sorted = sort_titles(lines, &titles, &scores);
    for title in &sorted.duplicates {
        log::warn!("Duplicate removed: {title}");
    }
    for title in &sorted.missing {
        log::warn!("Nonexistent page title removed: {title}");
    }

    let out = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    sorted
        .write_to(BufWriter::new(out))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {} sorted titles to {}", sorted.entries.len(), output.display());

    Ok(sorted)
}
