//! JSON Dataset View consumed by the web front end
//!
//! The view is derived data: it is built from a [`Dataset`] (or from a
//! normalized sensitivity dataset) and never read back into the array store.

use std::fs;
use std::path::Path;

use ndarray::ArrayViewD;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Result, SweepError};
use crate::model::{Dataset, Observable, ParameterAxis, ScaleKind, SweepLayout};

/// Metadata and sample values for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterView {
    /// Bare sample values of an axis without attributes
    Values(Vec<f64>),
    Described {
        name: String,
        description: String,
        range: [f64; 2],
        values: Vec<f64>,
    },
    /// Entry produced from a sensitivity source, with display labels
    Labelled {
        name: String,
        latex: String,
        values: Vec<f64>,
        value_labels: Vec<String>,
        range_string: String,
    },
}

impl ParameterView {
    pub fn from_axis(axis: &ParameterAxis) -> Self {
        match &axis.info {
            Some(info) => ParameterView::Described {
                name: info.name.clone(),
                description: info.description.clone(),
                range: [info.range_min, info.range_max],
                values: axis.values.clone(),
            },
            None => ParameterView::Values(axis.values.clone()),
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            ParameterView::Values(values)
            | ParameterView::Described { values, .. }
            | ParameterView::Labelled { values, .. } => values,
        }
    }
}

/// `parameters` is a mapping for array-store datasets and a list for
/// sensitivity datasets. Mapping order follows insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParametersView {
    Keyed(Vec<(String, ParameterView)>),
    Listed(Vec<ParameterView>),
}

impl ParametersView {
    pub fn len(&self) -> usize {
        match self {
            ParametersView::Keyed(entries) => entries.len(),
            ParametersView::Listed(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<&ParameterView> {
        match self {
            ParametersView::Keyed(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, view)| view),
            ParametersView::Listed(_) => None,
        }
    }
}

impl Serialize for ParametersView {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ParametersView::Keyed(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, view) in entries {
                    map.serialize_entry(key, view)?;
                }
                map.end()
            }
            ParametersView::Listed(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for view in entries {
                    seq.serialize_element(view)?;
                }
                seq.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewMetadata {
    pub description: String,
    pub xi_dimensions: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nm_dimensions: Option<Vec<usize>>,
    pub r_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m_unit: Option<String>,
    /// Set when `m_values` holds log10 masses rather than masses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m_scale: Option<String>,
    pub xi_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nm_description: Option<String>,
    pub data_type: String,
    /// Value-index extent of every parameter row, for ragged sweeps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_counts: Option<Vec<usize>>,
    /// Number of swept parameters, excluding the fiducial row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_bins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m_bins: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetView {
    pub parameters: ParametersView,
    pub r_values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m_values: Option<Vec<f64>>,
    pub xi_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nm_data: Option<Value>,
    pub metadata: ViewMetadata,
}

/// Nested JSON arrays in the array's own axis order, outermost first.
pub fn nested_json(array: ArrayViewD<'_, f64>) -> Value {
    if array.ndim() == 0 {
        return array.iter().next().map_or(Value::Null, |&v| Value::from(v));
    }
    Value::Array(array.outer_iter().map(nested_json).collect())
}

fn dataset_description(layout: SweepLayout, has_mass_function: bool) -> &'static str {
    match (layout, has_mass_function) {
        (SweepLayout::FullGrid, true) => "Galaxy clustering and halo mass function data",
        (SweepLayout::FullGrid, false) => "Galaxy clustering data",
        (SweepLayout::OneAtATime, true) => {
            "Galaxy clustering and halo mass function - One parameter at a time"
        }
        (SweepLayout::OneAtATime, false) => "Galaxy clustering - One parameter at a time",
    }
}

impl DatasetView {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let parameters = dataset
            .parameters
            .iter()
            .map(|axis| {
                let key = match dataset.layout {
                    SweepLayout::FullGrid => axis.entry_name(),
                    SweepLayout::OneAtATime => axis.index.to_string(),
                };
                (key, ParameterView::from_axis(axis))
            })
            .collect();

        let mass = dataset.mass.as_ref();
        let metadata = ViewMetadata {
            description: dataset_description(dataset.layout, mass.is_some()).to_string(),
            xi_dimensions: dataset.xi.shape().to_vec(),
            nm_dimensions: mass.map(|m| m.nm.shape().to_vec()),
            r_unit: ScaleKind::Separation.unit().to_string(),
            m_unit: mass.map(|_| ScaleKind::Mass.unit().to_string()),
            m_scale: None,
            xi_description: Observable::Xi.description().to_string(),
            nm_description: mass.map(|_| Observable::Nm.description().to_string()),
            data_type: dataset.layout.data_type().to_string(),
            value_counts: None,
            parameters: None,
            r_bins: None,
            m_bins: None,
        };

        DatasetView {
            parameters: ParametersView::Keyed(parameters),
            r_values: dataset.r_values.values().to_vec(),
            m_values: mass.map(|m| m.m_values.values().to_vec()),
            xi_data: nested_json(dataset.xi.view()),
            nm_data: mass.map(|m| nested_json(m.nm.view())),
            metadata,
        }
    }
}

/// Write `view` as indented JSON.
///
/// The document is fully serialized before the file is touched, so a failed
/// conversion never leaves a partial output behind.
pub fn write_view(path: &Path, view: &DatasetView) -> Result<()> {
    let entry = path.display().to_string();
    let bytes = serde_json::to_vec_pretty(view).map_err(|source| SweepError::Json {
        entry: entry.clone(),
        source,
    })?;
    fs::write(path, bytes).map_err(|e| SweepError::io(&entry, e))?;

    tracing::info!(
        path = %path.display(),
        parameters = view.parameters.len(),
        xi_dimensions = ?view.metadata.xi_dimensions,
        "Dataset view written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn test_nested_json_preserves_axis_order() {
        let array =
            ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let nested = nested_json(array.view());
        assert_eq!(nested, serde_json::json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
    }

    #[test]
    fn test_keyed_parameters_keep_insertion_order() {
        let params = ParametersView::Keyed(vec![
            ("param10".to_string(), ParameterView::Values(vec![0.0])),
            ("param2".to_string(), ParameterView::Values(vec![1.0])),
        ]);
        let text = serde_json::to_string(&params).unwrap();
        assert_eq!(text, r#"{"param10":[0.0],"param2":[1.0]}"#);
    }

    #[test]
    fn test_described_parameter_shape() {
        let view = ParameterView::Described {
            name: "h".to_string(),
            description: "Hubble parameter".to_string(),
            range: [0.5, 0.8],
            values: vec![0.5, 0.8],
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["range"], serde_json::json!([0.5, 0.8]));
        assert_eq!(value["name"], "h");
        assert_eq!(view.values(), &[0.5, 0.8]);
    }
}
