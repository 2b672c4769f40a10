use cityguard::bbox::BBox;
use cityguard::geometry::{aspect_ratio, intersection_over_union};
use cityguard::risk::{grade, grade_label};
use cityguard::trajectory::TrajectoryStore;
use cityguard::{
    Detection, FireDetection, Frame, IncidentClassifier, IncidentDetails, IncidentEngine,
    IncidentKind, ObjectClass, RiskLevel, Severity,
};
use nalgebra as na;

fn tracked_car(id: u32, x: f32, y: f32) -> Detection {
    Detection::new(ObjectClass::Car, BBox::ltrb(x, y, x + 80.0, y + 50.0), 0.9).with_track_id(id)
}

#[test]
fn empty_scene_is_normal() {
    let mut classifier = IncidentClassifier::default();
    let record = classifier.classify(&[], None);

    assert_eq!(record.incident_type, IncidentKind::Normal);
    assert_eq!(record.details.severity, Severity::Low);
    assert!(record.details.flags.is_empty());
    assert_eq!(record.risk(), RiskLevel::Low);
}

#[test]
fn lone_fire_detection() {
    let mut classifier = IncidentClassifier::default();
    let fire = vec![FireDetection::new(0.5)];
    let record = classifier.classify(&[], Some(&fire[..]));

    assert_eq!(record.label(), "Critical: Active Fire/Smoke Detected");
    assert_eq!(record.details.severity, Severity::High);
    assert_eq!(record.details.flags.len(), 1);
    assert!(record.details.flags[0].contains("0.50"));
}

#[test]
fn lone_wide_car_is_overturned() {
    let mut classifier = IncidentClassifier::default();
    let car = Detection::new(ObjectClass::Car, BBox::ltrb(100.0, 100.0, 300.0, 150.0), 0.8);

    assert_eq!(aspect_ratio(&car.bbox), 4.0);

    let record = classifier.classify(&[car], None);
    assert_eq!(record.label(), "Severe Emergency: Overturned Vehicle");
    assert_eq!(record.details.severity, Severity::High);
    assert_eq!(record.risk(), RiskLevel::High);
}

#[test]
fn jittering_queue_turns_into_gridlock() {
    let mut classifier = IncidentClassifier::default();
    let mut last = None;

    // ten vehicles creeping by less than a pixel per frame
    for step in 0..10 {
        let detections: Vec<Detection> = (0..10)
            .map(|id| {
                let jitter = if step % 2 == 0 { 0.0 } else { 0.7 };
                tracked_car(id, id as f32 * 120.0 + jitter, 300.0 + step as f32 * 0.5)
            })
            .collect();
        last = Some(classifier.classify(&detections, None));
    }

    let record = last.unwrap();
    assert_eq!(record.incident_type, IncidentKind::Gridlock);
    assert_eq!(record.details.severity, Severity::High);
    assert_eq!(record.details.vehicle_count, 10);
    assert_eq!(record.details.flags, vec!["Gridlock Alert: 10 vehicles immobilized"]);
}

#[test]
fn untracked_input_is_idempotent() {
    let detections = vec![
        Detection::new(ObjectClass::Bus, BBox::ltrb(0.0, 0.0, 200.0, 90.0), 0.9),
        Detection::new(ObjectClass::Person, BBox::ltrb(220.0, 0.0, 240.0, 60.0), 0.6),
        Detection::new(ObjectClass::Person, BBox::ltrb(260.0, 0.0, 280.0, 60.0), 0.6),
    ];

    let mut classifier = IncidentClassifier::default();
    let first = classifier.classify(&detections, None);
    let second = classifier.classify(&detections, None);

    assert_eq!(first, second);
    assert_eq!(first.incident_type, IncidentKind::Accident);
    assert!(classifier.trajectories().is_empty());
}

#[test]
fn geometry_properties() {
    let a = BBox::ltrb(10.0, 10.0, 50.0, 90.0);
    let b = BBox::ltrb(60.0, 10.0, 80.0, 90.0);

    assert_eq!(intersection_over_union(&a, &a), 1.0);
    assert_eq!(intersection_over_union(&a, &b), 0.0);
    assert_eq!(intersection_over_union(&b, &a), 0.0);
}

#[test]
fn trajectory_never_exceeds_capacity() {
    let mut store = TrajectoryStore::default();

    for i in 0..200 {
        store.record(3, na::Point2::new(i as f32, i as f32));
    }

    assert_eq!(store.history_of(3).len(), 15);
}

#[test]
fn grading_table() {
    assert_eq!(
        grade_label("Traffic Congestion", &IncidentDetails::with_vehicle_count(15)),
        RiskLevel::Medium
    );
    assert_eq!(
        grade_label("Traffic Congestion", &IncidentDetails::with_vehicle_count(3)),
        RiskLevel::Low
    );
    assert_eq!(
        grade_label("Severe Traffic Gridlock", &IncidentDetails::default()),
        RiskLevel::High
    );
    assert_eq!(
        grade(IncidentKind::Overturned, &IncidentDetails::default()).to_string(),
        "HIGH"
    );
}

#[test]
fn replayed_json_frames() {
    let lines = [
        r#"{"source": "cam-1", "detections": [{"class": 2, "box": [0, 0, 100, 60], "confidence": 0.9}]}"#,
        r#"{"source": "cam-2", "detections": [], "fire": [{"confidence": 0.8, "class": 1}]}"#,
        r#"{"detections": [{"class": 7, "box": [0, 0, 30, 90], "confidence": 0.9}]}"#,
    ];
    let mut engine = IncidentEngine::default();

    let labels: Vec<IncidentKind> = lines
        .iter()
        .map(|line| serde_json::from_str::<Frame>(line).unwrap())
        .map(|frame| engine.classify_frame(&frame).incident_type)
        .collect();

    assert_eq!(
        labels,
        vec![IncidentKind::Normal, IncidentKind::Fire, IncidentKind::Overturned]
    );
    assert_eq!(engine.sources().count(), 3);
}
