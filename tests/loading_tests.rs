use blockpuzzle::{
    DirectorySource, LoadError, PlacementEngine, PuzzleConfig, ShapeParseError, ShapeSource,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_shape(dir: &Path, id: usize, text: &str) {
    fs::write(dir.join(format!("block_{}.txt", id)), text).unwrap();
}

fn counting_shape() -> String {
    // 7 rows of 5, values cycling through every tag
    (0..35)
        .map(|i| ((i % 6) + 1).to_string())
        .collect::<Vec<_>>()
        .chunks(5)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A well-formed 7x5 file fills exactly the center plane, rows 1..=5.
#[test]
fn loading_fills_only_center_slab() {
    let dir = tempdir().unwrap();
    write_shape(dir.path(), 0, &counting_shape());
    let config = PuzzleConfig {
        piece_count: 1,
        ..PuzzleConfig::default()
    }
    .with_data_dir(dir.path());

    let engine = PlacementEngine::init(&config, &DirectorySource::from_config(&config)).unwrap();
    let shape = engine.piece(0).unwrap().shape();

    for x in 0..7 {
        for y in 0..7 {
            for z in 0..7 {
                let tag = shape.get(x, y, z).unwrap();
                if z == 3 && (1..=5).contains(&y) {
                    let i = (x * 5 + (y - 1)) as u8;
                    assert_eq!(tag, i % 6 + 1, "cell ({}, {}, {})", x, y, z);
                } else {
                    assert_eq!(tag, 0, "cell ({}, {}, {})", x, y, z);
                }
            }
        }
    }
}

#[test]
fn missing_file_fails_whole_init() {
    let dir = tempdir().unwrap();
    for id in [0, 1, 2, 4, 5] {
        write_shape(dir.path(), id, &counting_shape());
    }
    let config = PuzzleConfig::default().with_data_dir(dir.path());

    let err = PlacementEngine::init(&config, &DirectorySource::from_config(&config)).unwrap_err();
    match err {
        LoadError::Missing { piece, path } => {
            assert_eq!(piece, 3);
            assert!(path.ends_with("block_3.txt"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn malformed_file_fails_whole_init() {
    let dir = tempdir().unwrap();
    let config = PuzzleConfig {
        piece_count: 2,
        ..PuzzleConfig::default()
    }
    .with_data_dir(dir.path());
    write_shape(dir.path(), 0, &counting_shape());

    write_shape(dir.path(), 1, &counting_shape().replacen('6', "9", 1));
    let err = PlacementEngine::init(&config, &DirectorySource::from_config(&config)).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed {
            piece: 1,
            reason: ShapeParseError::OutOfRange { value: 9, .. }
        }
    ));

    write_shape(dir.path(), 1, "1 2 3");
    let err = PlacementEngine::init(&config, &DirectorySource::from_config(&config)).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed {
            piece: 1,
            reason: ShapeParseError::TooFewValues { found: 3, .. }
        }
    ));

    write_shape(dir.path(), 1, &counting_shape().replacen('2', "two", 1));
    let err = PlacementEngine::init(&config, &DirectorySource::from_config(&config)).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Malformed {
            piece: 1,
            reason: ShapeParseError::NotAnInteger { .. }
        }
    ));
    assert_eq!(err.piece(), Some(1));
}

#[test]
fn invalid_config_fails_before_reading() {
    let config = PuzzleConfig {
        shape_side: 4,
        ..PuzzleConfig::default()
    };
    let err = PlacementEngine::init(&config, &DirectorySource::new("nowhere")).unwrap_err();
    assert!(matches!(err, LoadError::Config(_)));
    assert_eq!(err.piece(), None);
}

#[test]
fn custom_file_naming_from_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("piece_0.dat"), counting_shape()).unwrap();
    let config = PuzzleConfig::from_json(&format!(
        r#"{{ "piece_count": 1, "file_prefix": "piece_", "file_extension": "dat", "data_dir": {:?} }}"#,
        dir.path().to_string_lossy()
    ))
    .unwrap();

    let source = DirectorySource::from_config(&config);
    assert!(source.read(0).is_ok());
    assert!(PlacementEngine::init(&config, &source).is_ok());
}

/// The shapes shipped in `data/` load and start out overlap-free.
#[test]
fn bundled_data_loads() {
    let config = PuzzleConfig::default()
        .with_data_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"));
    let engine = PlacementEngine::init(&config, &DirectorySource::from_config(&config)).unwrap();

    assert_eq!(engine.piece_count(), 6);
    assert!(engine.overlaps().is_empty());
    for piece in engine.pieces() {
        assert!(!piece.shape().is_empty());
        assert_eq!(piece.anchor(), (0, 0, 2 * piece.id() as i32));
    }
}
