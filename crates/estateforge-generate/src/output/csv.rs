//! Stage 4: atomic CSV serialization.
//!
//! The table is written to a sibling temp file, synced, then renamed
//! over the destination, so a failed run never leaves partial output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::GenerationError;
use crate::record::{COLUMNS, ListingRecord};

/// Write the dataset with a header row and one line per record.
/// Returns the number of bytes written.
pub fn write_dataset_csv(
    path: &Path,
    records: &[ListingRecord],
) -> Result<u64, GenerationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = temp_path(path)?;

    let file = File::create(&tmp_path)?;
    let counting = CountingWriter::new(BufWriter::new(file));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(COLUMNS.iter().map(|spec| spec.name))?;
    for record in records {
        writer.write_record(record.to_csv_record())?;
    }
    writer.flush()?;

    let counting = writer
        .into_inner()
        .map_err(|err| GenerationError::Io(err.into_error()))?;
    let bytes = counting.bytes_written();
    let file = counting
        .into_inner()
        .into_inner()
        .map_err(|err| GenerationError::Io(err.into_error()))?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;

    Ok(bytes)
}

fn temp_path(path: &Path) -> Result<PathBuf, GenerationError> {
    let file_name = path.file_name().ok_or_else(|| {
        GenerationError::InvalidConfig(format!(
            "output path '{}' has no file name",
            path.display()
        ))
    })?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
