//! Configuration Parsing and Validation Tests.

use pretty_assertions::assert_eq;
use rstest::rstest;
use tagsim_core::common::ConfigError;
use tagsim_core::config::{ReplacementPolicy, TagStoreConfig};

#[test]
fn defaults_describe_a_valid_cache() {
    let cfg = TagStoreConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.policy, ReplacementPolicy::Trash);
    assert_eq!(cfg.num_sets(), 512);
    assert_eq!(cfg.allocatable_ways(), 8);
    assert_eq!(cfg.policy_params.trash_bip_period, 23);
    assert_eq!(cfg.policy_params.trrip_bimodal_period, 80);
    assert_eq!(cfg.policy_params.rrpv_max, 7);
    assert_eq!(cfg.policy_params.region_boundary, 1 << 30);
}

#[test]
fn empty_document_uses_defaults() {
    let cfg = TagStoreConfig::from_json("{}").unwrap();
    assert_eq!(cfg.size_bytes, 256 * 1024);
    assert_eq!(cfg.block_size, 64);
    assert_eq!(cfg.assoc, 8);
    assert_eq!(cfg.alloc_assoc, None);
    assert!(!cfg.sequential_access);
}

#[rstest]
#[case("\"TRASH\"", ReplacementPolicy::Trash)]
#[case("\"trrip\"", ReplacementPolicy::Trrip)]
#[case("\"Wbar\"", ReplacementPolicy::Wbar)]
#[case("\"WBAR\"", ReplacementPolicy::Wbar)]
fn policy_names_parse(#[case] name: &str, #[case] expected: ReplacementPolicy) {
    let cfg = TagStoreConfig::from_json(&format!("{{\"policy\": {name}}}")).unwrap();
    assert_eq!(cfg.policy, expected);
}

#[test]
fn unknown_policy_is_a_json_error() {
    let err = TagStoreConfig::from_json(r#"{"policy": "LRU"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn partial_policy_params_keep_other_defaults() {
    let cfg = TagStoreConfig::from_json(
        r#"{"policy": "WBAR", "policy_params": {"region_boundary": 4096}}"#,
    )
    .unwrap();
    assert_eq!(cfg.policy_params.region_boundary, 4096);
    assert_eq!(cfg.policy_params.rrpv_max, 7);
}

#[rstest]
#[case::block_size(r#"{"block_size": 48}"#)]
#[case::zero_assoc(r#"{"assoc": 0}"#)]
#[case::ragged_size(r#"{"size_bytes": 1000}"#)]
#[case::odd_sets(r#"{"size_bytes": 1536, "assoc": 8}"#)]
#[case::alloc_too_large(r#"{"assoc": 4, "alloc_assoc": 5}"#)]
#[case::small_rrpv(r#"{"policy_params": {"rrpv_max": 1}}"#)]
#[case::zero_trash_period(r#"{"policy_params": {"trash_bip_period": 0}}"#)]
#[case::zero_trrip_period(r#"{"policy_params": {"trrip_bimodal_period": 0}}"#)]
fn invalid_documents_are_rejected(#[case] json: &str) {
    assert!(TagStoreConfig::from_json(json).is_err());
}

#[test]
fn validation_reports_specific_errors() {
    let mut cfg = TagStoreConfig {
        assoc: 4,
        alloc_assoc: Some(6),
        ..TagStoreConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::AllocAssocTooLarge {
            alloc_assoc: 6,
            assoc: 4
        })
    ));

    cfg.alloc_assoc = None;
    cfg.size_bytes = 3 * 64 * 4;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::SetCountNotPowerOfTwo(3))
    ));

    cfg.size_bytes = 100;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::SizeNotMultipleOfSet {
            size: 100,
            set_bytes: 256
        })
    ));
}

#[test]
fn oversized_geometry_is_an_error_not_a_panic() {
    let json = r#"{"size_bytes": 4096, "block_size": 4294967296, "assoc": 4294967296}"#;
    assert!(matches!(
        TagStoreConfig::from_json(json),
        Err(ConfigError::GeometryOverflow {
            block_size: 4_294_967_296,
            assoc: 4_294_967_296
        })
    ));

    let cfg = TagStoreConfig {
        block_size: 1 << 40,
        assoc: 1 << 40,
        ..TagStoreConfig::default()
    };
    assert_eq!(cfg.set_bytes(), None);
    assert_eq!(cfg.num_sets(), 0);
}

#[test]
fn zero_alloc_assoc_is_allowed() {
    let cfg = TagStoreConfig::from_json(r#"{"alloc_assoc": 0}"#).unwrap();
    assert_eq!(cfg.allocatable_ways(), 0);
}

#[test]
fn error_messages_name_the_problem() {
    let err = TagStoreConfig::from_json(r#"{"block_size": 48}"#).unwrap_err();
    assert_eq!(
        err.to_string(),
        "block size 48 is not a non-zero power of two"
    );
}
