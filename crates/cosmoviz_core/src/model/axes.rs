use serde::{Deserialize, Serialize};

/// Physical quantity a scale axis samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    /// Separation r in Mpc/h
    Separation,
    /// Halo mass M in solar masses
    Mass,
}

impl ScaleKind {
    pub fn unit(self) -> &'static str {
        match self {
            ScaleKind::Separation => "Mpc/h",
            ScaleKind::Mass => "M_sun",
        }
    }

    /// Container entry holding the axis values
    pub fn entry_name(self) -> &'static str {
        match self {
            ScaleKind::Separation => "r_values",
            ScaleKind::Mass => "m_values",
        }
    }
}

/// Ordered sample points of the last axis of an observable array.
///
/// Generated axes are strictly increasing and shared by every parameter
/// combination of a dataset; the values are never modified after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleAxis {
    kind: ScaleKind,
    values: Vec<f64>,
}

impl ScaleAxis {
    pub fn new(kind: ScaleKind, values: Vec<f64>) -> Self {
        Self { kind, values }
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.values.windows(2).all(|w| w[0] < w[1])
    }

    /// (first, last) sample, used for log summaries
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((*self.values.first()?, *self.values.last()?))
    }
}

/// Descriptive attributes stored alongside a parameter axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub description: String,
    pub range_min: f64,
    pub range_max: f64,
}

impl ParameterInfo {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.range_min && value <= self.range_max
    }

    /// A degenerate single-point range marks the reference axis.
    pub fn is_degenerate(&self) -> bool {
        self.range_min == self.range_max
    }
}

/// Sample values of one swept parameter, stored as `param{index}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAxis {
    pub index: usize,
    pub values: Vec<f64>,
    pub info: Option<ParameterInfo>,
}

impl ParameterAxis {
    pub fn new(index: usize, values: Vec<f64>) -> Self {
        Self {
            index,
            values,
            info: None,
        }
    }

    pub fn with_info(mut self, info: ParameterInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn entry_name(&self) -> String {
        format!("param{}", self.index)
    }

    pub fn info_entry_name(&self) -> String {
        format!("param{}_info", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_names() {
        let axis = ParameterAxis::new(3, vec![0.0, 1.0]);
        assert_eq!(axis.entry_name(), "param3");
        assert_eq!(axis.info_entry_name(), "param3_info");
        assert_eq!(ScaleKind::Mass.entry_name(), "m_values");
        assert_eq!(ScaleKind::Separation.unit(), "Mpc/h");
    }

    #[test]
    fn test_strictly_increasing() {
        let axis = ScaleAxis::new(ScaleKind::Separation, vec![0.1, 1.0, 10.0]);
        assert!(axis.is_strictly_increasing());
        assert_eq!(axis.bounds(), Some((0.1, 10.0)));

        let flat = ScaleAxis::new(ScaleKind::Separation, vec![1.0, 1.0]);
        assert!(!flat.is_strictly_increasing());
    }
}
