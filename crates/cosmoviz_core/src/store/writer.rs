use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use ndarray::{ArrayBase, ArrayView1, Data, Dimension};
use ndarray_npy::WriteNpyExt;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{array_member, attribute_member};
use crate::error::{Result, SweepError};
use crate::model::{Dataset, Observable, ParameterInfo};

struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored),
        }
    }

    fn start_member(&mut self, entry: &str, member: String) -> Result<()> {
        self.zip
            .start_file(member, self.options)
            .map_err(|source| SweepError::Archive {
                entry: entry.to_string(),
                source,
            })
    }

    fn write_array<S, D>(&mut self, entry: &str, array: &ArrayBase<S, D>) -> Result<()>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.start_member(entry, array_member(entry))?;
        array
            .write_npy(&mut self.zip)
            .map_err(|source| SweepError::NpyWrite {
                entry: entry.to_string(),
                source,
            })
    }

    fn write_vector(&mut self, entry: &str, values: &[f64]) -> Result<()> {
        self.write_array(entry, &ArrayView1::from(values))
    }

    fn write_attributes(&mut self, entry: &str, info: &ParameterInfo) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(info).map_err(|source| SweepError::Json {
            entry: entry.to_string(),
            source,
        })?;

        self.start_member(entry, attribute_member(entry))?;
        self.zip
            .write_all(&bytes)
            .map_err(|e| SweepError::io(entry, e))
    }

    fn finish(self, entry: &str) -> Result<W> {
        self.zip.finish().map_err(|source| SweepError::Archive {
            entry: entry.to_string(),
            source,
        })
    }
}

/// Persist `dataset` at `path`, replacing whatever was there.
///
/// The dataset is validated first so a container is never written with arrays
/// that disagree with their axes.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    dataset.validate()?;

    let container = path.display().to_string();
    let file = File::create(path).map_err(|e| SweepError::io(&container, e))?;
    let mut archive = ArchiveWriter::new(file);

    archive.write_array(Observable::Xi.entry_name(), &dataset.xi)?;
    archive.write_vector(
        dataset.r_values.kind().entry_name(),
        dataset.r_values.values(),
    )?;

    if let Some(mass) = &dataset.mass {
        archive.write_array(Observable::Nm.entry_name(), &mass.nm)?;
        archive.write_vector(mass.m_values.kind().entry_name(), mass.m_values.values())?;
    }

    for param in &dataset.parameters {
        archive.write_vector(&param.entry_name(), &param.values)?;
        if let Some(info) = &param.info {
            archive.write_attributes(&param.info_entry_name(), info)?;
        }
    }

    let mut file = archive.finish(&container)?;
    file.flush().map_err(|e| SweepError::io(&container, e))?;

    tracing::info!(
        path = %path.display(),
        parameters = dataset.parameters.len(),
        has_mass_function = dataset.mass.is_some(),
        "Dataset written"
    );
    Ok(())
}
