//! Loader for pre-computed sensitivity curves
//!
//! The source is a pair of JSON documents in one directory. Each maps a
//! parameter label (often LaTeX such as `$\Omega_m$`) to its sampled values
//! and the curve computed at each value:
//!
//! ```json
//! { "$\\Omega_m$": { "param_vals": [0.25, 0.35], "xi_vals": [[...], [...]] },
//!   "rvals": [...], "xi_ref_vals": [...] }
//! ```
//!
//! The mass-function document has the same parameter keys with `hmf_vals`,
//! plus `logMh` and `hmf_ref_vals`. Conversion follows the same
//! `Unloaded -> Loaded -> Parsed` stages as the array store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, SweepError};
use crate::model::{Observable, ScaleKind};
use crate::view::{DatasetView, ParameterView, ParametersView, ViewMetadata, write_view};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const XI_FILE: &str = "xi_gg_cosmo_sensitivity_data.json";
pub const HMF_FILE: &str = "hmf_cosmo_sensitivity_data.json";

const R_VALUES_KEY: &str = "rvals";
const XI_REFERENCE_KEY: &str = "xi_ref_vals";
const LOG_MASS_KEY: &str = "logMh";
const HMF_REFERENCE_KEY: &str = "hmf_ref_vals";

const PARAM_VALS_KEY: &str = "param_vals";
const XI_VALS_KEY: &str = "xi_vals";
const HMF_VALS_KEY: &str = "hmf_vals";

/// Sampled values of one parameter: a bare number or a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamVals {
    Scalar(f64),
    List(Vec<f64>),
}

impl ParamVals {
    pub fn into_vec(self) -> Vec<f64> {
        match self {
            ParamVals::Scalar(value) => vec![value],
            ParamVals::List(values) => values,
        }
    }
}

/// One curve, or one curve per sampled value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Curves {
    Single(Vec<f64>),
    Multiple(Vec<Vec<f64>>),
}

impl Curves {
    pub fn into_vec(self) -> Vec<Vec<f64>> {
        match self {
            Curves::Single(curve) => vec![curve],
            Curves::Multiple(curves) => curves,
        }
    }
}

/// A swept parameter with one ξ curve and one n(M) curve per value.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityParameter {
    /// Label exactly as it appears in the source
    pub label: String,
    pub values: Vec<f64>,
    pub xi_curves: Vec<Vec<f64>>,
    pub hmf_curves: Vec<Vec<f64>>,
}

impl SensitivityParameter {
    pub fn display_name(&self) -> &str {
        display_name(&self.label)
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn value_labels(&self) -> Vec<String> {
        self.values.iter().map(|&v| format_value(v)).collect()
    }

    pub fn range_string(&self) -> String {
        let (min, max) = self.bounds();
        range_string(self.display_name(), min, max, self.values.len())
    }

    fn view(&self) -> ParameterView {
        ParameterView::Labelled {
            name: self.display_name().to_string(),
            latex: self.label.clone(),
            values: self.values.clone(),
            value_labels: self.value_labels(),
            range_string: self.range_string(),
        }
    }
}

/// Normalized sensitivity data. Every curve list has already been checked
/// against its value list and scale axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityDataset {
    pub r_values: Vec<f64>,
    /// log10 of the halo mass in M_sun
    pub log_m_values: Vec<f64>,
    pub xi_reference: Vec<f64>,
    pub hmf_reference: Vec<f64>,
    pub parameters: Vec<SensitivityParameter>,
}

impl SensitivityDataset {
    /// Number of value rows per parameter, the reference row included.
    pub fn value_counts(&self) -> Vec<usize> {
        std::iter::once(1)
            .chain(self.parameters.iter().map(|p| p.values.len()))
            .collect()
    }

    pub fn to_view(&self) -> DatasetView {
        let fiducial = ParameterView::Labelled {
            name: "Fiducial Model".to_string(),
            latex: "Reference".to_string(),
            values: vec![0.0],
            value_labels: vec!["Reference".to_string()],
            range_string: "Reference Model".to_string(),
        };
        let parameters = std::iter::once(fiducial)
            .chain(self.parameters.iter().map(SensitivityParameter::view))
            .collect();

        let xi_data = std::iter::once(vec![self.xi_reference.clone()])
            .chain(self.parameters.iter().map(|p| p.xi_curves.clone()))
            .map(Value::from)
            .collect::<Vec<_>>();
        let nm_data = std::iter::once(vec![self.hmf_reference.clone()])
            .chain(self.parameters.iter().map(|p| p.hmf_curves.clone()))
            .map(Value::from)
            .collect::<Vec<_>>();

        let value_counts = self.value_counts();
        let rows = value_counts.len();
        let widest = value_counts.iter().copied().max().unwrap_or(0);
        let r_bins = self.r_values.len();
        let m_bins = self.log_m_values.len();

        DatasetView {
            parameters: ParametersView::Listed(parameters),
            r_values: self.r_values.clone(),
            m_values: Some(self.log_m_values.clone()),
            xi_data: Value::Array(xi_data),
            nm_data: Some(Value::Array(nm_data)),
            metadata: ViewMetadata {
                description: "Cosmology sensitivity data for web visualization".to_string(),
                xi_dimensions: vec![rows, widest, r_bins],
                nm_dimensions: Some(vec![rows, widest, m_bins]),
                r_unit: ScaleKind::Separation.unit().to_string(),
                m_unit: Some(ScaleKind::Mass.unit().to_string()),
                m_scale: Some("log10".to_string()),
                xi_description: Observable::Xi.description().to_string(),
                nm_description: Some(Observable::Nm.description().to_string()),
                data_type: "sensitivity_parameters".to_string(),
                value_counts: Some(value_counts),
                parameters: Some(self.parameters.len()),
                r_bins: Some(r_bins),
                m_bins: Some(m_bins),
            },
        }
    }
}

/// Strip one surrounding pair of `$` math delimiters.
pub fn display_name(label: &str) -> &str {
    if label.starts_with('$') && label.ends_with('$') {
        label.get(1..label.len().saturating_sub(1)).unwrap_or("")
    } else {
        label
    }
}

/// One decimal place, switching to exponent notation for very large or very
/// small magnitudes: `0.3`, `1.0e+03`, `5.0e-03`.
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1000.0 || (magnitude < 0.01 && value != 0.0) {
        exponent_notation(value)
    } else {
        format!("{value:.1}")
    }
}

/// `{:.1e}` with a signed, at least two-digit exponent.
fn exponent_notation(value: f64) -> String {
    let formatted = format!("{value:.1e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // inf and NaN have no exponent
        None => formatted,
    }
}

pub fn range_string(name: &str, min: f64, max: f64, count: usize) -> String {
    if count == 1 {
        format!("{name} = {}", format_value(min))
    } else {
        format!("{name}: {} - {}", format_value(min), format_value(max))
    }
}

/// Directory holding the two source documents.
#[derive(Debug, Clone)]
pub struct Unloaded {
    dir: PathBuf,
}

/// Both documents are parsed as JSON objects; their contents are unchecked.
#[derive(Debug, Clone)]
pub struct Loaded {
    xi: Map<String, Value>,
    hmf: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct Parsed {
    dataset: SensitivityDataset,
}

#[derive(Debug, Clone)]
pub struct SensitivityLoader<S> {
    state: S,
}

impl Default for SensitivityLoader<Unloaded> {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl SensitivityLoader<Unloaded> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            state: Unloaded { dir: dir.into() },
        }
    }

    pub fn dir(&self) -> &Path {
        &self.state.dir
    }

    pub fn load(self) -> Result<SensitivityLoader<Loaded>> {
        let dir = self.state.dir;
        let xi = read_document(&dir.join(XI_FILE))?;
        let hmf = read_document(&dir.join(HMF_FILE))?;
        Ok(SensitivityLoader {
            state: Loaded { xi, hmf },
        })
    }
}

fn read_document(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Err(SweepError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    let entry = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| SweepError::io(&entry, e))?;
    let document =
        serde_json::from_str(&text).map_err(|source| SweepError::Json { entry, source })?;
    tracing::debug!(path = %path.display(), "Sensitivity document loaded");
    Ok(document)
}

fn field<'a>(object: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value> {
    object.get(key).ok_or_else(|| {
        if parent.is_empty() {
            SweepError::missing(key)
        } else {
            SweepError::missing(format!("{parent}/{key}"))
        }
    })
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value, entry: String) -> Result<T> {
    T::deserialize(value).map_err(|source| SweepError::Json { entry, source })
}

fn number_list(object: &Map<String, Value>, key: &str) -> Result<Vec<f64>> {
    decode(field(object, "", key)?, key.to_string())
}

fn parameter_entry<'a>(document: &'a Map<String, Value>, label: &str) -> Result<&'a Map<String, Value>> {
    let value = field(document, "", label)?;
    value.as_object().ok_or_else(|| SweepError::Encoding {
        entry: label.to_string(),
        reason: format!("expected an object, found {value}"),
    })
}

/// Resolve a curve field and check it against the value count and scale axis.
fn curves_for(
    entry: &Map<String, Value>,
    label: &str,
    key: &str,
    value_count: usize,
    bins: usize,
) -> Result<Vec<Vec<f64>>> {
    let path = format!("{label}/{key}");
    let curves = decode::<Curves>(field(entry, label, key)?, path.clone())?.into_vec();
    if curves.len() != value_count {
        return Err(SweepError::shape_mismatch(path, value_count, curves.len()));
    }
    if let Some(curve) = curves.iter().find(|curve| curve.len() != bins) {
        return Err(SweepError::shape_mismatch(path, bins, curve.len()));
    }
    Ok(curves)
}

impl SensitivityLoader<Loaded> {
    /// Parameter labels in source order, taken from the ξ document.
    pub fn parameter_labels(&self) -> impl Iterator<Item = &str> {
        self.state
            .xi
            .keys()
            .map(String::as_str)
            .filter(|key| *key != R_VALUES_KEY && *key != XI_REFERENCE_KEY)
    }

    pub fn parse(self) -> Result<SensitivityLoader<Parsed>> {
        let Loaded { xi, hmf } = &self.state;

        let r_values = number_list(xi, R_VALUES_KEY)?;
        let xi_reference = number_list(xi, XI_REFERENCE_KEY)?;
        let log_m_values = number_list(hmf, LOG_MASS_KEY)?;
        let hmf_reference = number_list(hmf, HMF_REFERENCE_KEY)?;

        if xi_reference.len() != r_values.len() {
            return Err(SweepError::shape_mismatch(
                XI_REFERENCE_KEY,
                r_values.len(),
                xi_reference.len(),
            ));
        }
        if hmf_reference.len() != log_m_values.len() {
            return Err(SweepError::shape_mismatch(
                HMF_REFERENCE_KEY,
                log_m_values.len(),
                hmf_reference.len(),
            ));
        }

        let mut parameters = Vec::new();
        for label in self.parameter_labels() {
            let xi_entry = parameter_entry(xi, label)?;
            let hmf_entry = parameter_entry(hmf, label)?;

            let values_path = format!("{label}/{PARAM_VALS_KEY}");
            let values = decode::<ParamVals>(
                field(xi_entry, label, PARAM_VALS_KEY)?,
                values_path.clone(),
            )?
            .into_vec();
            if values.is_empty() {
                return Err(SweepError::shape_mismatch(values_path, 1, 0));
            }

            let xi_curves = curves_for(xi_entry, label, XI_VALS_KEY, values.len(), r_values.len())?;
            let hmf_curves = curves_for(
                hmf_entry,
                label,
                HMF_VALS_KEY,
                values.len(),
                log_m_values.len(),
            )?;

            let parameter = SensitivityParameter {
                label: label.to_string(),
                values,
                xi_curves,
                hmf_curves,
            };
            tracing::debug!(
                label,
                range = %parameter.range_string(),
                count = parameter.values.len(),
                "Sensitivity parameter"
            );
            parameters.push(parameter);
        }

        tracing::info!(
            parameters = parameters.len(),
            r_bins = r_values.len(),
            m_bins = log_m_values.len(),
            "Sensitivity data parsed"
        );
        Ok(SensitivityLoader {
            state: Parsed {
                dataset: SensitivityDataset {
                    r_values,
                    log_m_values,
                    xi_reference,
                    hmf_reference,
                    parameters,
                },
            },
        })
    }
}

impl SensitivityLoader<Parsed> {
    pub fn dataset(&self) -> &SensitivityDataset {
        &self.state.dataset
    }

    pub fn into_dataset(self) -> SensitivityDataset {
        self.state.dataset
    }

    pub fn convert(self) -> DatasetView {
        self.state.dataset.to_view()
    }
}

/// Load the sensitivity pair from `dir` and write its JSON view to `output`.
pub fn convert_sensitivity(dir: &Path, output: &Path) -> Result<DatasetView> {
    let view = SensitivityLoader::new(dir).load()?.parse()?.convert();
    write_view(output, &view)?;
    tracing::info!(
        dir = %dir.display(),
        output = %output.display(),
        "Sensitivity conversion complete"
    );
    Ok(view)
}
