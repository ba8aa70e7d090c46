//! Zone classification from rotation matrices through the full pipeline


use head_zone_control::{
    config::TrackingConfig,
    orientation::RotationTransform,
    pipeline::ZonePipeline,
    zones::{Zone, ZoneClassifier},
};
use test_helpers::assert_close;

const LITERAL_CASES: [(f64, f64, Zone); 7] = [
    (0.0, 0.0, Zone::Center),
    (-20.0, 20.0, Zone::BottomLeft),
    (20.0, -20.0, Zone::TopRight),
    (20.0, 0.0, Zone::Right),
    (0.0, -20.0, Zone::Up),
    (6.0, 0.0, Zone::Center),
    (0.0, 15.0, Zone::Down),
];

#[test]
fn test_literal_cases() {
    let classifier = ZoneClassifier::default();
    for (yaw, pitch, expected) in LITERAL_CASES {
        assert_eq!(classifier.classify(yaw, pitch), expected, "yaw={yaw}, pitch={pitch}");
    }
}

#[test]
fn test_literal_cases_from_matrices() {
    // alpha = 1 disables smoothing so the matrix angles reach the classifier as-is
    let config = TrackingConfig {
        alpha: 1.0,
        ..TrackingConfig::default()
    };

    for (yaw, pitch, expected) in LITERAL_CASES {
        let mut pipeline = ZonePipeline::new(&config).unwrap();
        let result = pipeline
            .process(&RotationTransform::from_yaw_pitch(yaw, pitch), 0)
            .unwrap();

        assert_close(result.pose.yaw, yaw, 1e-9);
        assert_close(result.pose.pitch, pitch, 1e-9);
        assert_eq!(result.zone, expected, "yaw={yaw}, pitch={pitch}");
    }
}

#[test]
fn test_landmarker_matrix_layout() {
    // Column-major 4x4 as emitted by face landmarkers, with a translation
    let rotation = RotationTransform::from_yaw_pitch(-25.0, 18.0);
    let mut values = [0.0; 16];
    for col in 0..3 {
        for row in 0..3 {
            values[col * 4 + row] = rotation.at(row, col);
        }
    }
    values[12] = 3.5;
    values[13] = -1.0;
    values[14] = -40.0;
    values[15] = 1.0;

    let transform = RotationTransform::from_column_major_4x4(values);
    assert_eq!(transform, rotation);

    let pose = transform.to_angular_pose().unwrap();
    assert_close(pose.yaw, -25.0, 1e-9);
    assert_close(pose.pitch, 18.0, 1e-9);
}

#[test]
fn test_mirror_corrected_yaw_sign() {
    // Forward vector pointing towards +x in camera space is the viewer's left
    let s = 30f64.to_radians().sin();
    let c = 30f64.to_radians().cos();
    let transform = RotationTransform::from_row_major([c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c]);

    let pose = transform.to_angular_pose().unwrap();
    assert_close(pose.yaw, -30.0, 1e-9);
    assert_close(pose.pitch, 0.0, 1e-9);
    assert_eq!(ZoneClassifier::default().classify(pose.yaw, pose.pitch), Zone::Left);
}

#[test]
fn test_every_zone_reachable_after_clamp() {
    let config = TrackingConfig::default();
    let targets = [
        (0.0, 0.0, Zone::Center),
        (0.0, -60.0, Zone::Up),
        (0.0, 60.0, Zone::Down),
        (-60.0, 0.0, Zone::Left),
        (60.0, 0.0, Zone::Right),
        (-60.0, -60.0, Zone::TopLeft),
        (60.0, -60.0, Zone::TopRight),
        (-60.0, 60.0, Zone::BottomLeft),
        (60.0, 60.0, Zone::BottomRight),
    ];

    for (yaw, pitch, expected) in targets {
        let mut pipeline = ZonePipeline::new(&config).unwrap();
        let transform = RotationTransform::from_yaw_pitch(yaw, pitch);
        let mut result = pipeline.process(&transform, 0).unwrap();
        for t in 1..30 {
            result = pipeline.process(&transform, t * 33).unwrap();
        }

        assert!(result.pose.yaw.abs() <= 45.0 && result.pose.pitch.abs() <= 45.0);
        assert_eq!(result.zone, expected, "target yaw={yaw}, pitch={pitch}");
    }
}
