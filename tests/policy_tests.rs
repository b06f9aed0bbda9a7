//! Policy resolution tests

mod common;

use cdfs::{
    build_image, CharacterSet, Error, FilesystemType, ImageOptions, IsoLevel, Policy, Profile,
};
use common::sample_tree;

#[test]
fn test_default_policy_is_plain_level1_iso() {
    let policy = Policy::resolve(&ImageOptions::default()).unwrap();
    assert_eq!(
        policy.profiles(),
        &[Profile::Iso9660 {
            level: IsoLevel::Level1,
            charset: CharacterSet::Dos,
        }]
    );
    assert!(policy.versions_enabled());
    assert!(!policy.raw_sectors());
}

#[test]
fn test_joliet_adds_supplementary_profile() {
    let options = ImageOptions {
        joliet: true,
        ..Default::default()
    };
    let policy = Policy::resolve(&options).unwrap();
    assert_eq!(policy.profiles().len(), 2);
    assert_eq!(policy.profiles()[1], Profile::Joliet);
}

#[test]
fn test_volume_id_normalized_and_padded() {
    let options = ImageOptions {
        volume_id: "my disc".into(),
        ..Default::default()
    };
    let policy = Policy::resolve(&options).unwrap();
    assert_eq!(&policy.volume_id()[..7], b"MY_DISC");
    assert!(policy.volume_id()[7..].iter().all(|&b| b == b' '));
    // The Joliet descriptor keeps the original text.
    assert_eq!(policy.volume_id_text(), "my disc");
}

#[test]
fn test_volume_id_too_long_is_rejected() {
    let options = ImageOptions {
        volume_id: "A".repeat(40),
        ..Default::default()
    };
    let err = Policy::resolve(&options).unwrap_err();
    match err {
        Error::InvalidPolicy { field, .. } => assert_eq!(field, "volume_id"),
        other => panic!("expected InvalidPolicy, got {other:?}"),
    }
}

#[test]
fn test_joliet_with_pure_udf_is_contradictory() {
    let options = ImageOptions {
        filesystem: FilesystemType::Udf,
        joliet: true,
        ..Default::default()
    };
    let err = Policy::resolve(&options).unwrap_err();
    match err {
        Error::InvalidPolicy { field, .. } => assert_eq!(field, "joliet"),
        other => panic!("expected InvalidPolicy, got {other:?}"),
    }
}

#[test]
fn test_unknown_udf_version_is_rejected() {
    let options = ImageOptions {
        filesystem: FilesystemType::Udf,
        udf_version: 0x0260,
        ..Default::default()
    };
    let err = Policy::resolve(&options).unwrap_err();
    match err {
        Error::InvalidPolicy { field, .. } => assert_eq!(field, "udf_version"),
        other => panic!("expected InvalidPolicy, got {other:?}"),
    }
}

#[test]
fn test_udf_build_reports_unsupported() {
    let options = ImageOptions {
        filesystem: FilesystemType::UdfBridge,
        ..Default::default()
    };
    let policy = Policy::resolve(&options).unwrap();
    let tree = sample_tree();
    let err = build_image(&tree, &policy, Vec::new()).unwrap_err();
    assert!(matches!(err, Error::Unsupported { .. }));
}
