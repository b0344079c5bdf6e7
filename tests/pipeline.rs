use std::fs;
use std::path::Path;

use boat_detector::models::ReplayRecord;
use boat_detector::{pipeline, Detection, IouMode, Rect, RefineConfig, RefineError, ReplayLog};
use image::{GrayImage, Luma};

fn write_image(path: &Path) {
    GrayImage::from_fn(200, 200, |x, y| Luma([((x * 3 + y) % 256) as u8]))
        .save(path)
        .unwrap();
}

#[test]
fn test_run_over_directory() {
    let dir = tempfile::tempdir().unwrap();
    let gt_dir = dir.path().join("ground_truth");
    fs::create_dir(&gt_dir).unwrap();

    write_image(&dir.path().join("01.png"));
    write_image(&dir.path().join("02.png"));
    fs::write(gt_dir.join("01.txt"), "boat: 10;90;10;90\n").unwrap();
    fs::write(gt_dir.join("02.txt"), "boat: 0;20;0;20\n").unwrap();

    let mut replay = ReplayLog::default();
    replay.insert(
        "01.png",
        ReplayRecord {
            detections: vec![
                Detection::new(Rect::new(10, 10, 50, 50), 0.1),
                Detection::new(Rect::new(40, 40, 50, 50), 0.9),
            ],
            verifications: None,
        },
    );

    let report = pipeline::run(
        dir.path(),
        "png",
        &gt_dir,
        &replay,
        &RefineConfig::default(),
    )
    .unwrap();

    assert_eq!(report.images.len(), 2);
    assert_eq!(report.images[0].image, "01.png");
    assert_eq!(report.images[0].boxes[0].rect, Rect::new(10, 10, 80, 80));
    assert_eq!(report.images[0].ious, vec![1.0]);
    assert!(report.images[1].boxes.is_empty());
    assert_eq!(report.mean_iou, Some(1.0));
}

#[test]
fn test_run_rejects_missing_ground_truth() {
    let dir = tempfile::tempdir().unwrap();
    let gt_dir = dir.path().join("ground_truth");
    fs::create_dir(&gt_dir).unwrap();

    write_image(&dir.path().join("01.png"));
    write_image(&dir.path().join("02.png"));
    fs::write(gt_dir.join("01.txt"), "boat: 10;90;10;90\n").unwrap();

    let err = pipeline::run(
        dir.path(),
        "png",
        &gt_dir,
        &ReplayLog::default(),
        &RefineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RefineError>(),
        Some(RefineError::GroundTruthAlignment {
            images: 2,
            ground_truth: 1
        })
    ));
}

#[test]
fn test_run_scores_with_enclosing_area() {
    let dir = tempfile::tempdir().unwrap();
    let gt_dir = dir.path().join("ground_truth");
    fs::create_dir(&gt_dir).unwrap();

    write_image(&dir.path().join("01.png"));
    fs::write(gt_dir.join("01.txt"), "boat: 50;130;50;130
").unwrap();

    let mut replay = ReplayLog::default();
    replay.insert(
        "01.png",
        ReplayRecord {
            detections: vec![Detection::new(Rect::new(10, 10, 80, 80), 0.5)],
            verifications: None,
        },
    );

    // 交集 40x40, 外接矩形 120x120
    let report = pipeline::run(dir.path(), "png", &gt_dir, &replay, &RefineConfig::default())
        .unwrap();
    assert!((report.images[0].ious[0] - 1600.0 / 14400.0).abs() < 1e-12);

    // 覆盖区域 6400 + 6400 - 1600
    let config = RefineConfig {
        iou_mode: IouMode::Union,
        ..Default::default()
    };
    let report = pipeline::run(dir.path(), "png", &gt_dir, &replay, &config).unwrap();
    assert!((report.images[0].ious[0] - 1600.0 / 11200.0).abs() < 1e-12);
}
