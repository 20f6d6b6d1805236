//! End-to-end dataset construction over in-memory signals.
//!
//! Every sample of a fixture signal encodes its recording and its position
//! (`tag * 1e6 + index`), so a window's origin can be read back from its
//! first value after shuffling.

use cwru_core::catalog::Catalog;
use cwru_core::data::MemorySignalSource;
use cwru_core::dataset::{Dataset, DatasetError, Partition};
use cwru_core::domain::{DatasetRequest, ExperimentFamily, InvalidConfiguration, RecordingDescriptor, Rpm};
use cwru_core::rng::{seeded_permutation, SHUFFLE_SEED};
use cwru_core::window::RecordingSplit;

const TAG: usize = 1_000_000;

fn rec(family: ExperimentFamily, rpm: Rpm, id: &str, n: u32) -> RecordingDescriptor {
    RecordingDescriptor {
        family,
        rpm,
        id: id.into(),
        url: format!("https://example.org/files/{n}.mat"),
    }
}

fn tagged_signal(tag: usize, len: usize) -> Vec<f64> {
    (0..len).map(|i| (tag * TAG + i) as f64).collect()
}

/// Three 12k drive-end faults and the baseline at 1797 rpm, plus noise
/// entries at other speeds and families that must never be selected.
fn catalog() -> Catalog {
    use ExperimentFamily::*;
    Catalog::from_entries(vec![
        rec(NormalBaseline, Rpm::R1797, "Normal", 97),
        rec(NormalBaseline, Rpm::R1772, "Normal", 98),
        rec(DriveEnd12k, Rpm::R1797, "0.007-InnerRace", 105),
        rec(DriveEnd12k, Rpm::R1772, "0.007-InnerRace", 106),
        rec(DriveEnd12k, Rpm::R1797, "0.007-Ball", 118),
        rec(FanEnd12k, Rpm::R1797, "0.007-InnerRace", 278),
        rec(DriveEnd12k, Rpm::R1797, "0.007-OuterRace6", 130),
        rec(DriveEnd48k, Rpm::R1797, "0.007-InnerRace", 109),
    ])
}

/// Memory source holding a tagged signal of `len` samples for every catalog
/// entry; the tag is the entry's position in the catalog.
fn source_for(catalog: &Catalog, len: usize) -> MemorySignalSource {
    let mut source = MemorySignalSource::new();
    for (i, entry) in catalog.entries().iter().enumerate() {
        source.insert(entry, tagged_signal(i, len));
    }
    source
}

fn build(window_len: usize, test_ratio: f64, len: usize) -> Dataset {
    let catalog = catalog();
    let source = source_for(&catalog, len);
    let request =
        DatasetRequest::new(ExperimentFamily::DriveEnd12k, Rpm::R1797, window_len, test_ratio)
            .unwrap();
    Dataset::build(&request, &catalog, &source).unwrap()
}

/// Train and test in their pre-shuffle order, rebuilt from the raw signals.
fn unshuffled(catalog: &Catalog, window_len: usize, test_ratio: f64, len: usize) -> (Partition, Partition) {
    let mut train = Partition::empty(window_len);
    let mut test = Partition::empty(window_len);
    let selection = catalog.select(ExperimentFamily::DriveEnd12k, Rpm::R1797);
    for (label, entry) in selection.iter().enumerate() {
        let tag = catalog.entries().iter().position(|e| e == entry).unwrap();
        let split = RecordingSplit::new(&tagged_signal(tag, len), window_len, test_ratio);
        train.push_rows(&split.windows, split.train_rows(), label);
        test.push_rows(&split.windows, split.test_rows(), label);
    }
    (train, test)
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn three_faults_plus_baseline_shapes() {
    // 100 windows of 500 samples per recording, 25% held out
    let ds = build(500, 0.25, 50_000);

    assert_eq!(ds.nclasses, 4);
    assert_eq!(ds.train.len(), 300);
    assert_eq!(ds.test.len(), 100);
    assert_eq!(ds.train.windows().rows(), 300);
    assert_eq!(ds.test.windows().rows(), 100);
    assert_eq!(ds.train.class_counts(4), vec![75; 4]);
    assert_eq!(ds.test.class_counts(4), vec![25; 4]);
}

#[test]
fn labels_are_selection_positions() {
    let ds = build(500, 0.25, 50_000);
    assert_eq!(
        ds.labels,
        vec!["Normal", "0.007-InnerRace", "0.007-Ball", "0.007-OuterRace6"]
    );
    for (i, summary) in ds.recordings.iter().enumerate() {
        assert_eq!(summary.label, i);
        assert_eq!(summary.id, ds.labels[i]);
    }
}

#[test]
fn incomplete_tail_is_discarded() {
    let ds = build(500, 0.25, 1049);
    for summary in &ds.recordings {
        assert_eq!(summary.samples, 1049);
        assert_eq!(summary.windows, 2);
        assert_eq!(summary.discarded, 49);
        assert_eq!(summary.train, 1);
        assert_eq!(summary.test, 1);
    }
    assert_eq!(ds.train.len(), 4);
    assert_eq!(ds.test.len(), 4);
}

#[test]
fn zero_test_ratio_puts_everything_in_train() {
    let ds = build(100, 0.0, 1000);
    assert_eq!(ds.train.len(), 40);
    assert!(ds.test.is_empty());
    assert_eq!(ds.test.windows().window_len(), 100);
}

#[test]
fn window_longer_than_every_signal_yields_empty_partitions() {
    let ds = build(5000, 0.25, 1000);
    assert_eq!(ds.nclasses, 4);
    assert!(ds.train.is_empty());
    assert!(ds.test.is_empty());
    assert!(ds.recordings.iter().all(|s| s.windows == 0 && s.discarded == 1000));
}

// ── Selection ────────────────────────────────────────────────────────

#[test]
fn baseline_and_only_matching_recordings_are_used() {
    let catalog = catalog();
    let ds = build(100, 0.25, 1000);
    let selected_tags = [0usize, 2, 4, 6];
    for (window, label) in ds.train.iter().chain(ds.test.iter()) {
        let tag = window[0] as usize / TAG;
        assert_eq!(tag, selected_tags[label]);
        let entry = &catalog.entries()[tag];
        assert_eq!(entry.rpm, Rpm::R1797);
        assert!(entry.family == ExperimentFamily::DriveEnd12k || entry.family.is_baseline());
    }
}

#[test]
fn embedded_catalog_selection_starts_with_baseline() {
    let catalog = Catalog::embedded().unwrap();
    for family in ExperimentFamily::REQUESTABLE {
        for rpm in Rpm::ALL {
            let selection = catalog.select(family, rpm);
            assert!(selection.iter().all(|d| d.rpm == rpm));
            assert!(selection
                .iter()
                .all(|d| d.family == family || d.family.is_baseline()));
            assert_eq!(
                selection.iter().filter(|d| d.id == "Normal").count(),
                1,
                "{family} {rpm}"
            );
        }
    }
}

// ── Split and shuffle ────────────────────────────────────────────────

#[test]
fn test_windows_are_the_temporal_tail_of_each_recording() {
    let ds = build(100, 0.3, 1000);
    // 10 windows per recording, floor(10 * 0.7) = 7 for training
    for (window, _) in ds.train.iter() {
        assert!(window[0] as usize % TAG < 700);
    }
    for (window, _) in ds.test.iter() {
        assert!(window[0] as usize % TAG >= 700);
    }
}

#[test]
fn partitions_are_shuffled_independently() {
    let catalog = catalog();
    let (train, test) = unshuffled(&catalog, 100, 0.25, 2000);
    let ds = build(100, 0.25, 2000);

    let train_order = seeded_permutation(train.len(), SHUFFLE_SEED);
    let test_order = seeded_permutation(test.len(), SHUFFLE_SEED);
    assert_eq!(ds.train.windows(), &train.windows().permuted(&train_order));
    assert_eq!(ds.test.windows(), &test.windows().permuted(&test_order));
    assert_eq!(
        ds.train.labels(),
        train_order.iter().map(|&i| train.labels()[i]).collect::<Vec<_>>()
    );
    assert_eq!(
        ds.test.labels(),
        test_order.iter().map(|&i| test.labels()[i]).collect::<Vec<_>>()
    );
}

#[test]
fn shuffle_actually_reorders() {
    let catalog = catalog();
    let (train, _) = unshuffled(&catalog, 100, 0.25, 2000);
    let ds = build(100, 0.25, 2000);
    assert_ne!(ds.train.windows(), train.windows());
}

#[test]
fn seed_zero_train_order_is_fixed() {
    // Two recordings of five windows each, everything in train. The shuffle
    // must place rows in this exact order on every machine and release.
    let entries = vec![
        rec(ExperimentFamily::NormalBaseline, Rpm::R1730, "Normal", 100),
        rec(ExperimentFamily::DriveEnd12k, Rpm::R1730, "0.021-Ball", 225),
    ];
    let mut source = MemorySignalSource::new();
    for (tag, entry) in entries.iter().enumerate() {
        source.insert(entry, tagged_signal(tag, 50));
    }
    let request = DatasetRequest::new(ExperimentFamily::DriveEnd12k, Rpm::R1730, 10, 0.0).unwrap();
    let ds = Dataset::build(&request, &Catalog::from_entries(entries), &source).unwrap();

    assert!(ds.test.is_empty());
    assert_eq!(ds.train.labels(), &[1, 0, 1, 0, 1, 0, 1, 0, 0, 1]);
    let origins: Vec<usize> = ds.train.iter().map(|(w, _)| w[0] as usize).collect();
    assert_eq!(
        origins,
        vec![TAG + 40, 30, TAG + 10, 40, TAG + 30, 10, TAG, 20, 0, TAG + 20]
    );
}

#[test]
fn builds_are_deterministic() {
    let a = build(250, 0.25, 10_000);
    let b = build(250, 0.25, 10_000);
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn fingerprint_depends_on_request() {
    let a = build(250, 0.25, 10_000);
    let b = build(250, 0.2, 10_000);
    assert_ne!(a.fingerprint(), b.fingerprint());
}

// ── Failures ─────────────────────────────────────────────────────────

#[test]
fn missing_recording_aborts_the_build() {
    let catalog = catalog();
    let mut source = MemorySignalSource::new();
    for entry in catalog.entries().iter().filter(|e| e.id != "0.007-Ball") {
        source.insert(entry, tagged_signal(0, 1000));
    }
    let request = DatasetRequest::new(ExperimentFamily::DriveEnd12k, Rpm::R1797, 100, 0.25).unwrap();
    match Dataset::build(&request, &catalog, &source) {
        Err(DatasetError::Acquisition { recording, .. }) => assert_eq!(recording, "0.007-Ball"),
        other => panic!("expected acquisition failure, got {other:?}"),
    }
}

#[test]
fn string_inputs_are_validated_before_any_work() {
    assert!(matches!(
        DatasetRequest::parse("12DriveEndFault", "1800", 500, 0.25),
        Err(InvalidConfiguration::UnknownRpm(_))
    ));
    assert!(matches!(
        DatasetRequest::parse("24DriveEndFault", "1797", 500, 0.25),
        Err(InvalidConfiguration::UnknownFamily(_))
    ));
    assert!(matches!(
        DatasetRequest::parse("NormalBaseline", "1797", 500, 0.25),
        Err(InvalidConfiguration::BaselineNotRequestable)
    ));
    assert!(matches!(
        DatasetRequest::parse("12DriveEndFault", "1797", 0, 0.25),
        Err(InvalidConfiguration::ZeroWindowLength)
    ));
    assert!(matches!(
        DatasetRequest::parse("12DriveEndFault", "1797", 500, 1.0),
        Err(InvalidConfiguration::TestRatioOutOfRange(_))
    ));
}
