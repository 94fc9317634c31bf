use linecount_rs::{
    Basis, Blob, BoundingBox, CountingLine, CountsTable, Direction, Point, Segment, Selector,
    attempt_count, segments_intersect,
};

fn vertical_line(label: &str, x: f32) -> CountingLine {
    CountingLine::new(label, Point::new(x, -5.0), Point::new(x, 25.0))
}

fn car(bbox: BoundingBox) -> Blob<()> {
    Blob::new(1, bbox, Some("car".to_string()), Some(0.9), ())
}

/// Replay a blob along `boxes`, counting after every move.
fn replay(blob: &mut Blob<()>, boxes: &[BoundingBox], lines: &[CountingLine]) -> CountsTable {
    let mut counts = CountsTable::for_lines(lines);
    for (frame, bbox) in boxes.iter().enumerate() {
        blob.move_to(*bbox);
        attempt_count(blob, lines, &mut counts, frame as u64);
    }
    counts
}

#[test]
fn test_touch_box_counts_once() {
    let lines = [vertical_line("gate", 15.0)];
    let mut blob = car(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    let counts = replay(
        &mut blob,
        &[
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(10.0, 0.0, 10.0, 10.0),
            BoundingBox::new(20.0, 0.0, 10.0, 10.0),
        ],
        &lines,
    );

    assert_eq!(counts.get("gate", "car"), 1);
    assert_eq!(counts.total(), 1);
    assert!(blob.has_crossed_line("gate"));
}

#[test]
fn test_touch_misses_a_jump_that_corners_catch() {
    let jump = [
        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        BoundingBox::new(20.0, 0.0, 10.0, 10.0),
    ];

    // Touch selectors only test the current box, so a box that clears the
    // line between two frames is never seen touching it.
    let touch = [vertical_line("gate", 15.0)];
    let counts = replay(&mut car(jump[0]), &jump, &touch);
    assert_eq!(counts.get("gate", "car"), 0);
    assert_eq!(counts.total(), 0);

    let cross = [vertical_line("gate", 15.0).with_selector(Selector::Corners)];
    let counts = replay(&mut car(jump[0]), &jump, &cross);
    assert_eq!(counts.get("gate", "car"), 1);
}

#[test]
fn test_direction_filter_picks_one_side() {
    let boxes = [
        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
        BoundingBox::new(20.0, 0.0, 10.0, 10.0),
    ];
    for basis in [Basis::First, Basis::Previous] {
        let lines = [
            vertical_line("left", 15.0)
                .with_selector(Selector::Centroid)
                .with_direction(Direction::Left)
                .with_basis(basis),
            vertical_line("right", 15.0)
                .with_selector(Selector::Centroid)
                .with_direction(Direction::Right)
                .with_basis(basis),
        ];
        let counts = replay(&mut car(boxes[0]), &boxes, &lines);
        assert_eq!(counts.line_total("left"), 1, "basis {basis:?}");
        assert_eq!(counts.line_total("right"), 0, "basis {basis:?}");
    }
}

#[test]
fn test_direction_reverses_with_motion() {
    let boxes = [
        BoundingBox::new(20.0, 0.0, 10.0, 10.0),
        BoundingBox::new(0.0, 0.0, 10.0, 10.0),
    ];
    let lines = [
        vertical_line("left", 15.0)
            .with_selector(Selector::Centroid)
            .with_direction(Direction::Left),
        vertical_line("right", 15.0)
            .with_selector(Selector::Centroid)
            .with_direction(Direction::Right),
    ];
    let counts = replay(&mut car(boxes[0]), &boxes, &lines);
    assert_eq!(counts.line_total("left"), 0);
    assert_eq!(counts.line_total("right"), 1);
}

#[test]
fn test_min_displacement_gates_counting() {
    let lines = [vertical_line("gate", 12.0)
        .with_selector(Selector::Centroid)
        .with_min_displacement(50.0)];
    let start = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

    // Centroid moves 10 px across the line.
    let counts = replay(
        &mut car(start),
        &[start, BoundingBox::new(10.0, 0.0, 10.0, 10.0)],
        &lines,
    );
    assert_eq!(counts.total(), 0);

    // Same crossing, 60 px from the first position.
    let counts = replay(
        &mut car(start),
        &[start, BoundingBox::new(60.0, 0.0, 10.0, 10.0)],
        &lines,
    );
    assert_eq!(counts.get("gate", "car"), 1);
}

#[test]
fn test_at_most_once_per_line() {
    let lines = [vertical_line("gate", 15.0)];
    let mut boxes = Vec::new();
    for _ in 0..4 {
        boxes.push(BoundingBox::new(10.0, 0.0, 10.0, 10.0));
        boxes.push(BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    }
    let mut blob = car(boxes[0]);
    let counts = replay(&mut blob, &boxes, &lines);
    assert_eq!(counts.get("gate", "car"), 1);
    assert_eq!(blob.lines_crossed().to_vec(), vec!["gate".to_string()]);
}

#[test]
fn test_repeated_attempt_is_idempotent() {
    let lines = [vertical_line("gate", 15.0), vertical_line("far", 500.0)];
    let mut blob = car(BoundingBox::new(10.0, 0.0, 10.0, 10.0));
    let mut counts = CountsTable::for_lines(&lines);

    let events = attempt_count(&mut blob, &lines, &mut counts, 0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].line, "gate");
    assert_eq!(events[0].object_id, 1);

    let snapshot = counts.clone();
    for frame in 1..4 {
        assert!(attempt_count(&mut blob, &lines, &mut counts, frame).is_empty());
    }
    assert_eq!(counts, snapshot);
    assert_eq!(blob.previous_box, Some(blob.bounding_box));
}

#[test]
fn test_unlabeled_blobs_share_a_bucket() {
    let lines = [vertical_line("gate", 15.0)];
    let mut counts = CountsTable::for_lines(&lines);
    for id in 1..=2 {
        let mut blob = Blob::new(id, BoundingBox::new(10.0, 0.0, 10.0, 10.0), None, None, ());
        let events = attempt_count(&mut blob, &lines, &mut counts, 0);
        assert_eq!(events[0].kind, None);
    }
    assert_eq!(counts.get("gate", "unlabeled"), 2);

    let json = serde_json::to_value(&counts).unwrap();
    assert_eq!(json, serde_json::json!({"gate": {"unlabeled": 2}}));
}

#[test]
fn test_intersection_is_symmetric() {
    let coords = [-2.0, 0.0, 1.0, 3.0];
    let mut points = Vec::new();
    for &x in &coords {
        for &y in &coords {
            points.push(Point::new(x, y));
        }
    }
    let segments: Vec<Segment> = points
        .iter()
        .step_by(3)
        .flat_map(|&a| points.iter().step_by(2).map(move |&b| Segment::new(a, b)))
        .collect();

    for a in &segments {
        for b in &segments {
            assert_eq!(
                segments_intersect(a, b).0,
                segments_intersect(b, a).0,
                "{a:?} vs {b:?}"
            );
        }
    }
}
