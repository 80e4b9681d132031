//! Integration tests for the review session.
//!
//! These tests verify end-to-end behavior over real image files:
//! - Priority ordering between algorithms
//! - Claiming across algorithms
//! - Skips and refiltering
//! - Empty and invalid directories

use fingerprint_dedup::core::fingerprint::Algorithm;
use fingerprint_dedup::core::session::{Session, SessionConfig};
use fingerprint_dedup::error::{ConfigError, SessionError};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn pattern(seed: u32) -> RgbImage {
    RgbImage::from_fn(96, 72, |x, y| {
        let r = ((x * 3 + seed * 17) % 256) as u8;
        let g = ((y * 5 + seed * 29) % 256) as u8;
        let b = (((x ^ y) * 2 + seed * 41) % 256) as u8;
        Rgb([r, g, b])
    })
}

fn save(image: &RgbImage, path: &Path) {
    image.save(path).unwrap();
}

/// Same pixels, different bytes: PNG written with non-default settings.
fn save_reencoded(image: &RgbImage, path: &Path) {
    let file = File::create(path).unwrap();
    PngEncoder::new_with_quality(file, CompressionType::Fast, FilterType::NoFilter)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
        .unwrap();
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn session_over(dir: &TempDir, files: &[&str], algorithms: &[Algorithm]) -> Session {
    let images = files.iter().map(|f| dir.path().join(f)).collect();
    let config = SessionConfig::new().algorithms(algorithms.iter().copied());
    Session::new(images, config).unwrap()
}

#[test]
fn exact_claims_before_perceptual_sees_the_remainder() {
    let dir = TempDir::new().unwrap();
    let image = pattern(1);
    save(&image, &dir.path().join("a.png"));
    fs::copy(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();
    save_reencoded(&image, &dir.path().join("c.png"));
    assert_ne!(
        fs::read(dir.path().join("a.png")).unwrap(),
        fs::read(dir.path().join("c.png")).unwrap()
    );

    let mut session = session_over(
        &dir,
        &["a.png", "b.png", "c.png"],
        &[Algorithm::Exact, Algorithm::Perceptual],
    );
    let report = session.run_once();

    let exact = report.section(Algorithm::Exact).unwrap();
    assert_eq!(exact.groups.len(), 1);
    assert_eq!(names(&[exact.groups[0].original.clone()]), vec!["a.png"]);
    assert_eq!(names(&exact.groups[0].duplicates), vec!["b.png"]);

    // c.png collides perceptually with a and b, but both are already claimed.
    let perceptual_index = session.index().unwrap().get(Algorithm::Perceptual).unwrap();
    assert_eq!(perceptual_index.collisions().count(), 1);
    assert!(report.section(Algorithm::Perceptual).unwrap().groups.is_empty());
    assert_eq!(report.duplicate_names, vec!["b.png"]);
}

#[test]
fn perceptual_groups_reencoded_copies() {
    let dir = TempDir::new().unwrap();
    let image = pattern(2);
    save(&image, &dir.path().join("first.png"));
    save_reencoded(&image, &dir.path().join("second.png"));

    let mut session = session_over(
        &dir,
        &["first.png", "second.png"],
        &[Algorithm::Exact, Algorithm::Perceptual],
    );
    let report = session.run_once();

    assert!(report.section(Algorithm::Exact).unwrap().groups.is_empty());
    let perceptual = report.section(Algorithm::Perceptual).unwrap();
    assert_eq!(perceptual.groups.len(), 1);
    assert_eq!(names(&perceptual.groups[0].duplicates), vec!["second.png"]);
}

#[test]
fn n_identical_copies_form_one_exact_group() {
    let dir = TempDir::new().unwrap();
    save(&pattern(3), &dir.path().join("copy0.png"));
    let mut files = vec!["copy0.png".to_string()];
    for i in 1..5 {
        let name = format!("copy{i}.png");
        fs::copy(dir.path().join("copy0.png"), dir.path().join(&name)).unwrap();
        files.push(name);
    }
    let files: Vec<&str> = files.iter().map(String::as_str).collect();

    let mut session = session_over(&dir, &files, &Algorithm::ALL);
    let report = session.run_once();

    assert_eq!(report.group_count(), 1);
    let exact = report.section(Algorithm::Exact).unwrap();
    assert_eq!(exact.groups[0].duplicates.len(), 4);
    for algorithm in &Algorithm::ALL[1..] {
        assert!(
            report.section(*algorithm).unwrap().groups.is_empty(),
            "{algorithm} should have no groups"
        );
    }
    assert_eq!(report.joined_names(), "copy1.png|copy2.png|copy3.png|copy4.png");
}

#[test]
fn distinct_images_produce_no_groups() {
    let dir = TempDir::new().unwrap();
    save(&pattern(4), &dir.path().join("x.png"));
    save(&RgbImage::from_pixel(64, 64, Rgb([200, 30, 30])), &dir.path().join("y.png"));

    let mut session = session_over(&dir, &["x.png", "y.png"], &Algorithm::ALL);
    let report = session.run_once();

    assert!(report.is_empty());
    assert_eq!(report.duplicate_count(), 0);
    assert_eq!(report.joined_names(), "");
}

#[test]
fn skipping_hides_a_duplicate_without_promoting_others() {
    let dir = TempDir::new().unwrap();
    save(&pattern(5), &dir.path().join("a.png"));
    fs::copy(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();
    fs::copy(dir.path().join("a.png"), dir.path().join("c.png")).unwrap();

    let mut session = session_over(&dir, &["a.png", "b.png", "c.png"], &Algorithm::ALL);
    assert_eq!(session.run_once().duplicate_count(), 2);

    session.skip(dir.path().join("b.png"));
    let report = session.refilter().unwrap();
    assert_eq!(report.duplicate_names, vec!["c.png"]);

    // Skipping the last duplicate removes the group entirely.
    session.skip(dir.path().join("c.png"));
    let report = session.refilter().unwrap();
    assert!(report.is_empty());
    assert_eq!(session.clustering().unwrap().groups.len(), 1);
}

#[test]
fn skips_survive_reset() {
    let dir = TempDir::new().unwrap();
    save(&pattern(6), &dir.path().join("a.png"));
    fs::copy(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();

    let mut session = session_over(&dir, &["a.png", "b.png"], &[Algorithm::Exact]);
    session.run_once();
    session.skip(dir.path().join("b.png"));

    session.reset();
    assert!(matches!(session.refilter(), Err(SessionError::NotBuilt)));
    assert!(session.run_once().is_empty());
}

#[test]
fn repeated_sessions_are_deterministic() {
    let dir = TempDir::new().unwrap();
    save(&pattern(7), &dir.path().join("a.png"));
    fs::copy(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();
    save_reencoded(&pattern(7), &dir.path().join("c.png"));
    save(&pattern(8), &dir.path().join("d.png"));

    let files = ["d.png", "c.png", "b.png", "a.png"];
    let first = session_over(&dir, &files, &Algorithm::ALL).run_once();
    let second = session_over(&dir, &files, &Algorithm::ALL).run_once();

    assert_eq!(first.pairs, second.pairs);
    assert_eq!(first.joined_names(), second.joined_names());
    // Enumeration order decides the original.
    assert_eq!(first.pairs[0].original, dir.path().join("b.png"));
}

#[test]
fn directory_session_lists_only_images() {
    let dir = TempDir::new().unwrap();
    save(&pattern(9), &dir.path().join("a.png"));
    fs::copy(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();
    fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::copy(dir.path().join("a.png"), dir.path().join("nested").join("c.png")).unwrap();

    let config = SessionConfig::new().algorithms([Algorithm::Exact]);
    let mut session = Session::from_directory(dir.path(), config).unwrap();

    assert_eq!(session.images().len(), 2);
    assert_eq!(session.run_once().duplicate_count(), 1);
}

#[test]
fn empty_directory_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let result = Session::from_directory(dir.path(), SessionConfig::new());
    assert!(matches!(result, Err(ConfigError::EmptyDirectory { .. })));
}

#[test]
fn directory_without_images_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.md"), "# hi").unwrap();
    let result = Session::from_directory(dir.path(), SessionConfig::new());
    assert!(matches!(result, Err(ConfigError::EmptyDirectory { .. })));
}

#[test]
fn missing_directory_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let result = Session::from_directory(&dir.path().join("missing"), SessionConfig::new());
    assert!(matches!(result, Err(ConfigError::DirectoryNotFound { .. })));
}

#[test]
fn corrupt_files_are_recorded_not_fatal() {
    let dir = TempDir::new().unwrap();
    save(&pattern(10), &dir.path().join("good.png"));
    fs::write(dir.path().join("corrupt.jpg"), b"this is not a valid image file").unwrap();

    let config = SessionConfig::new().algorithms([Algorithm::Exact, Algorithm::Perceptual]);
    let mut session = Session::from_directory(dir.path(), config).unwrap();
    let report = session.run_once();

    assert!(report.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].algorithm, Algorithm::Perceptual);
    assert_eq!(report.failures[0].path, dir.path().join("corrupt.jpg"));
}
