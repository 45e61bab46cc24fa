//! Raw big-endian caches
//!
//! # Format
//!
//! - links cache: the packed link array as consecutive big-endian `u32`
//! - score file: one big-endian `f64` per page id, `0..id_limit`
//!
//! Neither file has a header; the element count is the file length divided
//! by the element width.

use super::packed::PackedLinks;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};

impl PackedLinks {
    /// Write the packed array as big-endian `u32`s
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written
    pub async fn write_raw<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut writer = BufWriter::new(file);
        for &value in self.as_slice() {
            writer
                .write_u32(value)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        writer
            .flush()
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Read and validate a raw links cache
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, its length is not a multiple
    /// of 4, or the integers do not form a valid packed array
    pub async fn read_raw<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (mut reader, count) = open_fixed_width(path, 4).await?;

        let mut links = Vec::with_capacity(count);
        for _ in 0..count {
            let value = reader
                .read_u32()
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            links.push(value);
        }

        Self::new(links).with_context(|| format!("Invalid links cache {}", path.display()))
    }
}

/// Write a score vector as big-endian `f64`s
///
/// # Errors
///
/// Returns error if the file cannot be created or written
pub async fn write_scores<P: AsRef<Path>>(scores: &[f64], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    for &score in scores {
        writer
            .write_f64(score)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    writer
        .flush()
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Read a score vector written by [`write_scores`]
///
/// # Errors
///
/// Returns error if the file cannot be read or its length is not a multiple of 8
pub async fn read_scores<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let (mut reader, count) = open_fixed_width(path, 8).await?;

    let mut scores = Vec::with_capacity(count);
    for _ in 0..count {
        let score = reader
            .read_f64()
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        scores.push(score);
    }
    Ok(scores)
}

async fn open_fixed_width(path: &Path, width: u64) -> Result<(BufReader<File>, usize)> {
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    if len % width != 0 {
        bail!(
            "{} is {len} bytes, not a multiple of {width}",
            path.display()
        );
    }
    let count = usize::try_from(len / width)
        .with_context(|| format!("{} is too large for this platform", path.display()))?;
    Ok((BufReader::new(file), count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PageId;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_links_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.raw");

        let links = PackedLinks::from_edges([
            (PageId(0), PageId(1)),
            (PageId(2), PageId(1)),
            (PageId(1), PageId(70_000)),
        ]);
        links.write_raw(&path).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), links.as_slice().len() * 4);
        assert_eq!(&bytes[..8], &[0, 0, 0, 1, 0, 0, 0, 2]);

        let loaded = PackedLinks::read_raw(&path).await.unwrap();
        assert_eq!(loaded, links);
    }

    #[tokio::test]
    async fn test_corrupt_links_cache() {
        let dir = tempdir().unwrap();

        let odd = dir.path().join("odd.raw");
        std::fs::write(&odd, [0_u8, 0, 0, 1, 0]).unwrap();
        assert!(PackedLinks::read_raw(&odd).await.is_err());

        // dest 1, count 5, but only one source follows
        let overrun = dir.path().join("overrun.raw");
        std::fs::write(&overrun, [0_u8, 0, 0, 1, 0, 0, 0, 5, 0, 0, 0, 0]).unwrap();
        let err = PackedLinks::read_raw(&overrun).await.unwrap_err();
        assert!(err.to_string().contains("Invalid links cache"));

        assert!(PackedLinks::read_raw(dir.path().join("missing.raw")).await.is_err());
    }

    #[tokio::test]
    async fn test_scores_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.raw");

        let scores = vec![0.25, 0.0, 0.75];
        write_scores(&scores, &path).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &0.25_f64.to_be_bytes());

        assert_eq!(read_scores(&path).await.unwrap(), scores);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_write_failure_names_file() {
        // Every write to /dev/full fails once the buffer spills
        let scores = vec![0.5; 10_000];
        let err = write_scores(&scores, "/dev/full").await.unwrap_err();
        assert!(format!("{err:#}").contains("/dev/full"));

        let links = PackedLinks::from_edges((0..10_000).map(|i| (PageId(i), PageId(i + 1))));
        let err = links.write_raw("/dev/full").await.unwrap_err();
        assert!(err.to_string().contains("Failed to write /dev/full"));
    }

    #[tokio::test]
    async fn test_truncated_scores() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.raw");
        std::fs::write(&path, [0_u8; 12]).unwrap();
        assert!(read_scores(&path).await.is_err());
    }
}
