//! Tests for array container to JSON view conversion
//!
//! These tests verify that:
//! - The nested JSON arrays flatten back to the stored arrays
//! - Parameters are keyed by entry name (grid) or row index (one-at-a-time)
//! - Metadata describes dimensions, units and layout
//! - A failed conversion leaves no output file behind

use serde_json::Value;

use super::small_config;
use crate::convert::{StoreConversion, convert_store};
use crate::error::SweepError;
use crate::model::SweepLayout;
use crate::store::write_dataset;
use crate::synth::{generate_full_grid, generate_one_at_a_time};
use crate::view::ParameterView;

fn flatten(value: &Value, out: &mut Vec<f64>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten(item, out)),
        Value::Number(n) => out.push(n.as_f64().unwrap()),
        other => panic!("unexpected JSON value {other}"),
    }
}

fn nested_shape(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut current = value;
    while let Value::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    shape
}

#[test]
fn test_full_grid_view_matches_store() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.npz");
    let output = dir.path().join("data.json");

    let dataset = generate_full_grid(&small_config(31)).unwrap();
    write_dataset(&input, &dataset).unwrap();
    let view = convert_store(&input, SweepLayout::FullGrid, &output).unwrap();

    assert_eq!(view.metadata.xi_dimensions, vec![3, 3, 3, 3, 40]);
    assert_eq!(view.metadata.nm_dimensions, Some(vec![3, 3, 3, 3, 35]));
    assert_eq!(view.metadata.data_type, "full_grid_parameters");

    let written: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(nested_shape(&written["xi_data"]), view.metadata.xi_dimensions);

    let mut xi = Vec::new();
    flatten(&written["xi_data"], &mut xi);
    assert_eq!(xi, dataset.xi.iter().copied().collect::<Vec<_>>());

    let mut nm = Vec::new();
    flatten(&written["nm_data"], &mut nm);
    let stored_nm = &dataset.mass.as_ref().unwrap().nm;
    assert_eq!(nm, stored_nm.iter().copied().collect::<Vec<_>>());

    let keys: Vec<&String> = written["parameters"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["param1", "param2", "param3", "param4"]);
    assert_eq!(written["parameters"]["param2"], serde_json::json!([0.0, 1.0, 2.0]));
}

#[test]
fn test_one_at_a_time_view_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data_one.npz");
    let output = dir.path().join("data_one.json");

    write_dataset(&input, &generate_one_at_a_time(&small_config(32)).unwrap()).unwrap();
    let view = convert_store(&input, SweepLayout::OneAtATime, &output).unwrap();

    let metadata = &view.metadata;
    assert_eq!(metadata.xi_dimensions, vec![5, 3, 40]);
    assert_eq!(metadata.r_unit, "Mpc/h");
    assert_eq!(metadata.m_unit.as_deref(), Some("M_sun"));
    assert_eq!(metadata.data_type, "one_by_one_parameters");
    assert_eq!(metadata.xi_description, "Two-point correlation function");
    assert_eq!(metadata.nm_description.as_deref(), Some("Halo mass function"));

    match view.parameters.get("2") {
        Some(ParameterView::Described {
            name, range, values, ..
        }) => {
            assert_eq!(name, "σ_8");
            assert_eq!(*range, [0.6, 1.2]);
            assert_eq!(values.len(), 3);
        }
        other => panic!("unexpected parameter view {other:?}"),
    }

    let written: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(written["parameters"]["0"]["name"], "Fiducial");
    assert_eq!(written["parameters"]["0"]["range"], serde_json::json!([0.3, 0.3]));
    assert_eq!(written["r_values"].as_array().unwrap().len(), 40);
    assert_eq!(written["m_values"].as_array().unwrap().len(), 35);
}

#[test]
fn test_stages_expose_intermediate_state() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data_one.npz");
    let dataset = generate_one_at_a_time(&small_config(33)).unwrap();
    write_dataset(&input, &dataset).unwrap();

    let unloaded = StoreConversion::new(&input, SweepLayout::OneAtATime);
    assert_eq!(unloaded.path(), input.as_path());

    let loaded = unloaded.load().unwrap();
    assert!(loaded.container().contains_array("xi"));
    assert!(loaded.container().contains_array("param4"));

    let parsed = loaded.parse().unwrap();
    assert_eq!(parsed.dataset(), &dataset);

    let view = parsed.convert();
    assert_eq!(view.parameters.len(), 5);
    assert!(view.nm_data.is_some());
}

#[test]
fn test_correlation_only_view_omits_mass_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.npz");
    let output = dir.path().join("data.json");
    let config = crate::config::GenerationConfig {
        include_mass_function: false,
        ..small_config(34)
    };
    write_dataset(&input, &generate_full_grid(&config).unwrap()).unwrap();
    convert_store(&input, SweepLayout::FullGrid, &output).unwrap();

    let written: Value = serde_json::from_slice(&std::fs::read(&output).unwrap()).unwrap();
    let object = written.as_object().unwrap();
    assert!(!object.contains_key("nm_data"));
    assert!(!object.contains_key("m_values"));
    assert!(!written["metadata"].as_object().unwrap().contains_key("nm_dimensions"));
    assert_eq!(written["metadata"]["description"], "Galaxy clustering data");
}

#[test]
fn test_missing_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.npz");
    let output = dir.path().join("data.json");

    let err = convert_store(&input, SweepLayout::FullGrid, &output).unwrap_err();
    assert!(matches!(err, SweepError::MissingSource { .. }));
    assert!(!output.exists());
}

#[test]
fn test_failed_parse_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let full = dir.path().join("full.npz");
    let damaged = dir.path().join("damaged.npz");
    let output = dir.path().join("data_one.json");
    write_dataset(&full, &generate_one_at_a_time(&small_config(35)).unwrap()).unwrap();
    super::store::rewrite_container(&full, &damaged, &["param0.npy"], &[]);

    let err = convert_store(&damaged, SweepLayout::OneAtATime, &output).unwrap_err();
    assert!(matches!(err, SweepError::MissingEntry { ref entry } if entry == "param0"));
    assert!(!output.exists());
}
