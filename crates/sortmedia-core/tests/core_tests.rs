use sortmedia_core::{
    CreationDate, DirectoryPolicy, Fingerprint, MediaKind, PathClass, PlacementOutcome,
    PolicyClassifier, RunStatistics,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_fingerprint_creation_and_hex() {
    let bytes = [0xab; 32];
    let fingerprint = Fingerprint::new(bytes);

    let hex = fingerprint.to_hex();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(hex.starts_with("ab"));
    assert_eq!(fingerprint.to_string(), hex);

    assert_eq!(fingerprint, Fingerprint::new(bytes));
    assert_ne!(fingerprint, Fingerprint::new([0xcd; 32]));
}

#[test]
fn test_media_kind_serde_names() {
    assert_eq!(MediaKind::Photo.to_string(), "photo");
    assert_eq!(MediaKind::Video.to_string(), "video");
    assert_eq!("video".parse::<MediaKind>().unwrap(), MediaKind::Video);
}

#[test]
fn test_placement_outcome_is_tri_state() {
    let outcomes = [
        PlacementOutcome::Empty,
        PlacementOutcome::Identical,
        PlacementOutcome::Conflicting,
    ];
    for (i, a) in outcomes.iter().enumerate() {
        for (j, b) in outcomes.iter().enumerate() {
            assert_eq!(i == j, a == b);
        }
    }
}

#[test]
fn test_creation_date_month_names() {
    let months: Vec<String> = (1..=12)
        .map(|m| CreationDate::from_ymd(2020, m, 1).unwrap().month.to_string())
        .collect();
    assert_eq!(months[0], "January");
    assert_eq!(months[8], "September");
    assert_eq!(months[11], "December");
}

#[test]
fn test_classifier_canonicalizes_existing_roots() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().canonicalize().unwrap();
    fs::create_dir_all(source.join("keep/out")).unwrap();

    let policy = DirectoryPolicy::new(vec![PathBuf::from("keep/./out")], Vec::new());
    let classifier = PolicyClassifier::new(&policy, &source);

    assert_eq!(classifier.exclude_roots(), &[source.join("keep/out")]);
    assert_eq!(
        classifier.classify(&source.join("keep/out/a.jpg")),
        PathClass::Excluded
    );
    assert_eq!(classifier.classify(&source.join("keep/a.jpg")), PathClass::Normal);
}

#[test]
fn test_run_statistics_default_is_zero() {
    let stats = RunStatistics::default();
    assert_eq!(stats.total_processed(), 0);
    assert_eq!(stats.duplicates, 0);
    assert_eq!(stats.excluded, 0);
}
