//! Parquet cache for the title map
//!
//! Based on `DuckDB` (Raasveldt et al., SIGMOD 2019) columnar storage patterns.
//!
//! # Format
//!
//! One Parquet file with columns (`page_id`: UInt32, `title`: Utf8), ZSTD
//! compressed, rows in ascending id order.

use super::{PageId, PageTitles};
use anyhow::{Context, Result};
use arrow::array::{StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

impl PageTitles {
    /// Write the title map to a Parquet file
    ///
    /// # Errors
    ///
    /// Returns error if file I/O fails or Arrow conversion fails
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let pages = self.sorted_by_id();
        let ids: Vec<u32> = pages.iter().map(|(id, _)| id.0).collect();
        let titles: Vec<&str> = pages.iter().map(|&(_, title)| title).collect();

        // Create Arrow schema
        let schema = Arc::new(Schema::new(vec![
            Field::new("page_id", DataType::UInt32, false),
            Field::new("title", DataType::Utf8, false),
        ]));

        let id_array = Arc::new(UInt32Array::from(ids));
        let title_array = Arc::new(StringArray::from(titles));

        let batch = RecordBatch::try_new(schema.clone(), vec![id_array, title_array])
            .context("Failed to create titles RecordBatch")?;

        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::ZSTD(
                parquet::basic::ZstdLevel::try_new(3)?,
            ))
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    /// Read a title map written by [`PageTitles::write_parquet`]
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or a column has the wrong type
    #[allow(clippy::unused_async)] // Async API for future I/O operations
    pub async fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut titles = Self::new();

        for batch_result in reader {
            let batch: RecordBatch = batch_result?;

            let ids = batch
                .column(0)
                .as_any()
                .downcast_ref::<UInt32Array>()
                .context("Invalid page_id column type")?;

            let names = batch
                .column(1)
                .as_any()
                .downcast_ref::<StringArray>()
                .context("Invalid title column type")?;

            for i in 0..batch.num_rows() {
                titles.insert(PageId(ids.value(i)), names.value(i).to_string());
            }
        }

        Ok(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_parquet_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("titles.parquet");

        let titles: PageTitles = [
            (PageId(1), "Main_Page".to_string()),
            (PageId(7), "東京都".to_string()),
            (PageId(3), "O'Brien".to_string()),
        ]
        .into_iter()
        .collect();

        titles.write_parquet(&path).await.unwrap();
        let loaded = PageTitles::read_parquet(&path).await.unwrap();

        assert_eq!(loaded, titles);
        assert_eq!(loaded.id_of("東京都"), Some(PageId(7)));
    }

    #[tokio::test]
    async fn test_empty_titles_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.parquet");

        PageTitles::new().write_parquet(&path).await.unwrap();
        let loaded = PageTitles::read_parquet(&path).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = PageTitles::read_parquet(dir.path().join("nope.parquet"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
