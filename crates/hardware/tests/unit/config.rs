//! # Configuration Tests
//!
//! Geometry validation, derived sizes, JSON loading with long and short
//! keys, and layering of command line values over a config file.

use std::path::{Path, PathBuf};

use csim_core::common::ConfigError;
use csim_core::config::{Geometry, PartialGeometry, SimConfig};
use pretty_assertions::assert_eq;

use crate::common::harness::temp_file;

#[test]
fn default_geometry_matches_usage_example() {
    let g = Geometry::default();
    assert_eq!(g, Geometry::new(4, 1, 4).unwrap());
    assert_eq!(g.num_sets(), 16);
    assert_eq!(g.block_size(), 16);
}

#[test]
fn derived_sizes() {
    let g = Geometry::new(5, 4, 6).unwrap();
    assert_eq!(g.num_sets(), 32);
    assert_eq!(g.block_size(), 64);
    assert_eq!(g.total_lines(), Some(128));
}

#[test]
fn zero_set_and_block_bits_are_valid() {
    let g = Geometry::new(0, 1, 0).unwrap();
    assert_eq!(g.num_sets(), 1);
    assert_eq!(g.block_size(), 1);
}

#[test]
fn zero_associativity_rejected() {
    assert!(matches!(
        Geometry::new(2, 0, 2),
        Err(ConfigError::ZeroAssociativity)
    ));
}

#[test]
fn address_bits_overflow_rejected() {
    assert!(matches!(
        Geometry::new(40, 1, 30),
        Err(ConfigError::AddressBitsOverflow {
            set_bits: 40,
            block_bits: 30
        })
    ));
    assert!(Geometry::new(10, 1, 54).is_ok());
}

#[test]
fn too_many_sets_rejected() {
    assert!(matches!(
        Geometry::new(64, 1, 0),
        Err(ConfigError::TooManySets(64))
    ));
}

// ══════════════════════════════════════════════════════════
// JSON
// ══════════════════════════════════════════════════════════

#[test]
fn json_short_keys() {
    let g = Geometry::from_json_str(r#"{ "s": 8, "E": 2, "b": 4 }"#).unwrap();
    assert_eq!(g, Geometry::new(8, 2, 4).unwrap());
}

#[test]
fn json_long_keys() {
    let g =
        Geometry::from_json_str(r#"{ "set_bits": 1, "lines_per_set": 4, "block_bits": 0 }"#)
            .unwrap();
    assert_eq!(g, Geometry::new(1, 4, 0).unwrap());
}

#[test]
fn json_missing_field_reports_flag() {
    assert!(matches!(
        Geometry::from_json_str(r#"{ "s": 8, "b": 4 }"#),
        Err(ConfigError::MissingArgument("-E"))
    ));
}

#[test]
fn json_unknown_field_rejected() {
    assert!(matches!(
        PartialGeometry::from_json_str(r#"{ "s": 8, "ways": 4 }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn json_invalid_geometry_rejected() {
    assert!(matches!(
        Geometry::from_json_str(r#"{ "s": 1, "E": 0, "b": 1 }"#),
        Err(ConfigError::ZeroAssociativity)
    ));
}

#[test]
fn json_from_file() {
    let file = temp_file(r#"{ "s": 2, "E": 3, "b": 5 }"#);
    let g = Geometry::from_json_file(file.path()).unwrap();
    assert_eq!(g, Geometry::new(2, 3, 5).unwrap());
}

#[test]
fn json_file_missing_is_io_error() {
    let err = Geometry::from_json_file(Path::new("/nonexistent/geometry.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/geometry.json"));
}

// ══════════════════════════════════════════════════════════
// Layering
// ══════════════════════════════════════════════════════════

/// Flags override file values field by field.
#[test]
fn merge_prefers_overlay() {
    let file = PartialGeometry {
        set_bits: Some(4),
        lines_per_set: Some(1),
        block_bits: Some(4),
    };
    let flags = PartialGeometry {
        lines_per_set: Some(8),
        ..PartialGeometry::default()
    };
    assert_eq!(
        file.merge(flags),
        PartialGeometry {
            set_bits: Some(4),
            lines_per_set: Some(8),
            block_bits: Some(4),
        }
    );
}

#[test]
fn sim_config_requires_trace() {
    let partial = PartialGeometry {
        set_bits: Some(1),
        lines_per_set: Some(1),
        block_bits: Some(1),
    };
    assert!(matches!(
        SimConfig::new(partial, None, false),
        Err(ConfigError::MissingArgument("-t"))
    ));

    let config = SimConfig::new(partial, Some(PathBuf::from("t.trace")), true).unwrap();
    assert_eq!(config.geometry, Geometry::new(1, 1, 1).unwrap());
    assert!(config.verbose);
}

#[test]
fn sim_config_reports_first_missing_geometry_flag() {
    assert!(matches!(
        SimConfig::new(PartialGeometry::default(), Some(PathBuf::from("t")), false),
        Err(ConfigError::MissingArgument("-s"))
    ));
}
