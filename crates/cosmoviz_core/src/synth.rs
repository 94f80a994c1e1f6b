//! Synthetic array builder
//!
//! Every row of an observable array is a baseline curve modulated by affine
//! factors of the row's normalized parameter position, then multiplied by
//! `1 + sigma * z` with i.i.d. standard normal `z` per scale bin.
//!
//! The random generator is always passed in. Each observable draws from its
//! own stream seeded once from that generator, and the reference row is the
//! first row of its stream, so it depends on neither the number of swept
//! parameters nor their coefficients.

use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;

use crate::config::GenerationConfig;
use crate::curves::{CurveShape, Factors};
use crate::error::{Result, SweepError};
use crate::grid::{GridIndices, fiducial_axis, index_samples, normalized_position, parameter_axis};
use crate::model::{
    CosmoParameter, Dataset, FIDUCIAL, FULL_GRID_RESPONSE, MassFunction, Observable,
    ParameterAxis, ScaleAxis, ScaleKind, SweepLayout,
};

/// Recipe for one row of an observable array.
#[derive(Debug, Clone, Copy)]
struct RowSpec {
    factors: Factors,
    sigma: f64,
    /// Amplitude of the `sin(2 log10 x)` term, already scaled by position
    oscillation: f64,
}

/// Build a generator from a fixed seed, or from OS entropy when none is given.
///
/// Returns the seed actually used so an unseeded run can still be reproduced.
pub fn seeded_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
    (StdRng::seed_from_u64(seed), seed)
}

fn push_row<R: Rng + ?Sized>(
    rng: &mut R,
    shape: &CurveShape,
    axis: &ScaleAxis,
    row: RowSpec,
    out: &mut Vec<f64>,
) {
    for &x in axis.values() {
        let z: f64 = rng.sample(StandardNormal);
        let wobble = row.oscillation * (2.0 * x.log10()).sin();
        out.push(shape.evaluate(x, row.factors) * (1.0 + row.sigma * z + wobble));
    }
}

fn build_array<R: Rng + ?Sized>(
    rng: &mut R,
    observable: Observable,
    axis: &ScaleAxis,
    leading: &[usize],
    rows: impl Iterator<Item = RowSpec>,
) -> Result<ArrayD<f64>> {
    let shape = CurveShape::for_observable(observable);
    let row_count: usize = leading.iter().product();
    let mut data = Vec::with_capacity(row_count * axis.len());
    for row in rows {
        push_row(rng, &shape, axis, row, &mut data);
    }

    let mut full_shape = leading.to_vec();
    full_shape.push(axis.len());
    ArrayD::from_shape_vec(IxDyn(&full_shape), data)
        .map_err(|source| SweepError::shape(observable.entry_name(), source))
}

/// Cartesian sweep over every parameter, one leading axis each.
///
/// All parameters share the joint response, evaluated at the mean normalized
/// position of the combination.
pub fn full_grid<R: Rng + ?Sized>(rng: &mut R, config: &GenerationConfig) -> Result<Dataset> {
    let count = config.values_per_parameter;
    let parameters: Vec<ParameterAxis> = (1..=CosmoParameter::ALL.len())
        .map(|index| ParameterAxis::new(index, index_samples(count)))
        .collect();
    let leading = vec![count; parameters.len()];

    let mut xi_rng = StdRng::seed_from_u64(rng.next_u64());
    let mut nm_rng = StdRng::seed_from_u64(rng.next_u64());

    let joint_rows = |observable: Observable, sigma: f64| {
        let response = FULL_GRID_RESPONSE.for_observable(observable);
        GridIndices::new(&leading).map(move |indices| {
            let t = if indices.is_empty() {
                0.0
            } else {
                indices
                    .iter()
                    .map(|&i| normalized_position(i, count))
                    .sum::<f64>()
                    / indices.len() as f64
            };
            RowSpec {
                factors: response.factors(t),
                sigma,
                oscillation: 0.0,
            }
        })
    };

    let r_values = config.separation.axis(ScaleKind::Separation);
    let xi = build_array(
        &mut xi_rng,
        Observable::Xi,
        &r_values,
        &leading,
        joint_rows(Observable::Xi, config.noise.full_grid_xi),
    )?;

    let mass = if config.include_mass_function {
        let m_values = config.mass.axis(ScaleKind::Mass);
        let nm = build_array(
            &mut nm_rng,
            Observable::Nm,
            &m_values,
            &leading,
            joint_rows(Observable::Nm, config.noise.full_grid_nm),
        )?;
        Some(MassFunction { m_values, nm })
    } else {
        None
    };

    Ok(Dataset {
        layout: SweepLayout::FullGrid,
        parameters,
        r_values,
        xi,
        mass,
    })
}

/// Reference row followed by one row per swept parameter, each varied alone
/// across its physical range.
pub fn one_at_a_time<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GenerationConfig,
    swept: &[CosmoParameter],
) -> Result<Dataset> {
    let count = config.values_per_parameter;
    let mut parameters = Vec::with_capacity(swept.len() + 1);
    parameters.push(fiducial_axis(0, &FIDUCIAL, count));
    for (offset, param) in swept.iter().enumerate() {
        parameters.push(parameter_axis(offset + 1, param.definition(), count));
    }
    let leading = [parameters.len(), count];

    let mut xi_rng = StdRng::seed_from_u64(rng.next_u64());
    let mut nm_rng = StdRng::seed_from_u64(rng.next_u64());

    let noise = config.noise;
    let fiducial_sigma = noise.fiducial;
    let rows = |observable: Observable, sigma: f64, oscillation: f64| {
        let baseline = CurveShape::for_observable(observable).baseline_factors();
        let reference = (0..count).map(move |_| RowSpec {
            factors: baseline,
            sigma: fiducial_sigma,
            oscillation: 0.0,
        });
        let varied = swept.iter().flat_map(move |param| {
            let response = param.response().for_observable(observable);
            (0..count).map(move |value_index| {
                let t = normalized_position(value_index, count);
                RowSpec {
                    factors: response.factors(t),
                    sigma,
                    oscillation: oscillation * t,
                }
            })
        });
        reference.chain(varied)
    };

    let r_values = config.separation.axis(ScaleKind::Separation);
    let xi = build_array(
        &mut xi_rng,
        Observable::Xi,
        &r_values,
        &leading,
        rows(Observable::Xi, noise.swept_xi, noise.oscillation),
    )?;

    let mass = if config.include_mass_function {
        let m_values = config.mass.axis(ScaleKind::Mass);
        let nm = build_array(
            &mut nm_rng,
            Observable::Nm,
            &m_values,
            &leading,
            rows(Observable::Nm, noise.swept_nm, 0.0),
        )?;
        Some(MassFunction { m_values, nm })
    } else {
        None
    };

    Ok(Dataset {
        layout: SweepLayout::OneAtATime,
        parameters,
        r_values,
        xi,
        mass,
    })
}

fn log_generated(dataset: &Dataset, seed: u64) {
    tracing::info!(
        seed,
        layout = ?dataset.layout,
        xi_shape = ?dataset.xi.shape(),
        nm_shape = ?dataset.mass.as_ref().map(|m| m.nm.shape().to_vec()),
        "Synthetic dataset generated"
    );
    if let Some((first, last)) = dataset.r_values.bounds() {
        tracing::debug!(
            points = dataset.r_values.len(),
            first,
            last,
            unit = ScaleKind::Separation.unit(),
            "Separation axis"
        );
    }
    if let Some((first, last)) = dataset.mass.as_ref().and_then(|m| m.m_values.bounds()) {
        tracing::debug!(first, last, unit = ScaleKind::Mass.unit(), "Mass axis");
    }
}

/// Full-grid dataset with the run's generator established once from `config.seed`.
pub fn generate_full_grid(config: &GenerationConfig) -> Result<Dataset> {
    let (mut rng, seed) = seeded_rng(config.seed);
    let dataset = full_grid(&mut rng, config)?;
    log_generated(&dataset, seed);
    Ok(dataset)
}

/// One-at-a-time dataset over every known cosmological parameter.
pub fn generate_one_at_a_time(config: &GenerationConfig) -> Result<Dataset> {
    let (mut rng, seed) = seeded_rng(config.seed);
    let dataset = one_at_a_time(&mut rng, config, &CosmoParameter::ALL)?;
    log_generated(&dataset, seed);
    for param in &dataset.parameters {
        if let Some(info) = &param.info {
            tracing::debug!(
                index = param.index,
                name = %info.name,
                description = %info.description,
                "Swept parameter"
            );
        }
    }
    Ok(dataset)
}
