use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, Ix1};
use ndarray_npy::ReadNpyExt;
use serde_json::{Map, Value};
use zip::ZipArchive;

use super::{
    ARRAY_SUFFIX, ATTRIBUTE_SUFFIX, DESCRIPTION_ATTR, NAME_ATTR, RANGE_MAX_ATTR, RANGE_MIN_ATTR,
};
use crate::error::{Result, SweepError};
use crate::model::{
    Dataset, MassFunction, Observable, ParameterAxis, ParameterInfo, ScaleAxis, ScaleKind,
    SweepLayout,
};

/// Every member of a container, read into memory with the file already closed.
///
/// Arrays are decoded eagerly. Attribute groups stay as raw bytes until
/// [`RawContainer::into_dataset`] decodes the ones it needs.
#[derive(Debug, Clone)]
pub struct RawContainer {
    path: PathBuf,
    arrays: BTreeMap<String, ArrayD<f64>>,
    attributes: BTreeMap<String, Vec<u8>>,
}

impl RawContainer {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SweepError::MissingSource {
                path: path.to_path_buf(),
            });
        }
        let container = path.display().to_string();
        let file = File::open(path).map_err(|e| SweepError::io(&container, e))?;
        let mut zip = ZipArchive::new(file).map_err(|source| SweepError::Archive {
            entry: container.clone(),
            source,
        })?;

        let mut arrays = BTreeMap::new();
        let mut attributes = BTreeMap::new();
        for i in 0..zip.len() {
            let mut member = zip.by_index(i).map_err(|source| SweepError::Archive {
                entry: container.clone(),
                source,
            })?;
            let name = member.name().to_string();

            if let Some(entry) = name.strip_suffix(ARRAY_SUFFIX) {
                let array =
                    ArrayD::<f64>::read_npy(&mut member).map_err(|source| SweepError::NpyRead {
                        entry: entry.to_string(),
                        source,
                    })?;
                arrays.insert(entry.to_string(), array);
            } else if let Some(entry) = name.strip_suffix(ATTRIBUTE_SUFFIX) {
                let mut bytes = Vec::new();
                member
                    .read_to_end(&mut bytes)
                    .map_err(|e| SweepError::io(entry, e))?;
                attributes.insert(entry.to_string(), bytes);
            } else {
                tracing::debug!(member = %name, "Skipping unrecognised container member");
            }
        }

        tracing::debug!(
            path = %path.display(),
            arrays = arrays.len(),
            attribute_groups = attributes.len(),
            "Container loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            arrays,
            attributes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains_array(&self, entry: &str) -> bool {
        self.arrays.contains_key(entry)
    }

    pub fn array_entries(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    fn take_array(&mut self, entry: &str) -> Result<ArrayD<f64>> {
        self.arrays
            .remove(entry)
            .ok_or_else(|| SweepError::missing(entry))
    }

    fn take_vector(&mut self, entry: &str) -> Result<Vec<f64>> {
        let array = self.take_array(entry)?;
        let ndim = array.ndim();
        let vector = array
            .into_dimensionality::<Ix1>()
            .map_err(|_| SweepError::shape_mismatch(entry, 1, ndim))?;
        Ok(vector.to_vec())
    }

    /// Decode the attribute group `entry`, or `None` when the container has none.
    pub fn attributes(&self, entry: &str) -> Option<Result<ParameterInfo>> {
        self.attributes
            .get(entry)
            .map(|bytes| decode_attributes(entry, bytes))
    }

    /// Reconstruct the dataset described by this container.
    ///
    /// Which `param{i}` entries are required follows from the layout and the
    /// shape of `xi`: `param1..=paramN` for an N-parameter full grid, and
    /// `param0..paramP` for a one-at-a-time sweep with P rows. `nm` is
    /// optional, but once present its `m_values` axis is required.
    pub fn into_dataset(mut self, layout: SweepLayout) -> Result<Dataset> {
        let xi = self.take_array(Observable::Xi.entry_name())?;
        let r_values = ScaleAxis::new(
            ScaleKind::Separation,
            self.take_vector(ScaleKind::Separation.entry_name())?,
        );

        let mass = if self.contains_array(Observable::Nm.entry_name()) {
            let nm = self.take_array(Observable::Nm.entry_name())?;
            let m_values = ScaleAxis::new(
                ScaleKind::Mass,
                self.take_vector(ScaleKind::Mass.entry_name())?,
            );
            Some(MassFunction { m_values, nm })
        } else {
            None
        };

        let indices = match layout {
            SweepLayout::FullGrid => 1..xi.ndim().max(1),
            SweepLayout::OneAtATime => 0..xi.shape().first().copied().unwrap_or(0),
        };

        let mut parameters = Vec::with_capacity(indices.len());
        for index in indices {
            let mut axis = ParameterAxis::new(index, Vec::new());
            axis.values = self.take_vector(&axis.entry_name())?;
            axis.info = self.attributes(&axis.info_entry_name()).transpose()?;
            parameters.push(axis);
        }

        let dataset = Dataset {
            layout,
            parameters,
            r_values,
            xi,
            mass,
        };
        dataset.validate()?;
        Ok(dataset)
    }
}

fn decode_attributes(entry: &str, bytes: &[u8]) -> Result<ParameterInfo> {
    let text = std::str::from_utf8(bytes).map_err(|e| SweepError::Encoding {
        entry: entry.to_string(),
        reason: e.to_string(),
    })?;
    let attributes: Map<String, Value> =
        serde_json::from_str(text).map_err(|source| SweepError::Json {
            entry: entry.to_string(),
            source,
        })?;

    Ok(ParameterInfo {
        name: text_attribute(&attributes, entry, NAME_ATTR)?,
        description: text_attribute(&attributes, entry, DESCRIPTION_ATTR)?,
        range_min: number_attribute(&attributes, entry, RANGE_MIN_ATTR)?,
        range_max: number_attribute(&attributes, entry, RANGE_MAX_ATTR)?,
    })
}

fn attribute<'a>(attributes: &'a Map<String, Value>, entry: &str, key: &str) -> Result<&'a Value> {
    attributes
        .get(key)
        .ok_or_else(|| SweepError::missing(format!("{entry}/{key}")))
}

fn text_attribute(attributes: &Map<String, Value>, entry: &str, key: &str) -> Result<String> {
    let encoding_error = |reason: String| SweepError::Encoding {
        entry: format!("{entry}/{key}"),
        reason,
    };

    match attribute(attributes, entry, key)? {
        Value::String(text) => Ok(text.clone()),
        // Byte-string attributes arrive as arrays of code units
        Value::Array(units) => {
            let bytes = units
                .iter()
                .map(|unit| unit.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| {
                    encoding_error("byte string contains values outside 0..=255".to_string())
                })?;
            String::from_utf8(bytes).map_err(|e| encoding_error(e.to_string()))
        }
        other => Err(encoding_error(format!("expected text, found {other}"))),
    }
}

fn number_attribute(attributes: &Map<String, Value>, entry: &str, key: &str) -> Result<f64> {
    let value = attribute(attributes, entry, key)?;
    value.as_f64().ok_or_else(|| SweepError::Encoding {
        entry: format!("{entry}/{key}"),
        reason: format!("expected a number, found {value}"),
    })
}

/// Load a dataset written by [`write_dataset`](super::write_dataset).
pub fn read_dataset(path: &Path, layout: SweepLayout) -> Result<Dataset> {
    let dataset = RawContainer::load(path)?.into_dataset(layout)?;
    tracing::info!(
        path = %path.display(),
        xi_shape = ?dataset.xi.shape(),
        parameters = dataset.parameters.len(),
        has_mass_function = dataset.mass.is_some(),
        "Dataset read"
    );
    Ok(dataset)
}
