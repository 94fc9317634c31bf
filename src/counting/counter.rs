//! Per-blob counting against the configured lines.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::counting::candidates::lines_for;
use crate::counting::crossing::has_crossed;
use crate::counting::line::CountingLine;
use crate::geometry::Point;
use crate::tracker::Blob;

/// Count key used for blobs that never received a type label.
pub const UNLABELED_KIND: &str = "unlabeled";

/// Crossing counts keyed by line label, then by object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountsTable {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl CountsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with an empty entry for every line.
    pub fn for_lines(lines: &[CountingLine]) -> Self {
        let counts = lines
            .iter()
            .map(|line| (line.label.clone(), BTreeMap::new()))
            .collect();
        Self { counts }
    }

    /// Add one crossing and return the new count for `(line, kind)`.
    pub fn increment(&mut self, line: &str, kind: &str) -> u64 {
        let count = self
            .counts
            .entry(line.to_string())
            .or_default()
            .entry(kind.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    pub fn get(&self, line: &str, kind: &str) -> u64 {
        self.counts
            .get(line)
            .and_then(|by_kind| by_kind.get(kind))
            .copied()
            .unwrap_or(0)
    }

    /// Counts per type for one line.
    pub fn line(&self, line: &str) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(line)
    }

    /// Sum over all types for one line.
    pub fn line_total(&self, line: &str) -> u64 {
        self.line(line).map(|by_kind| by_kind.values().sum()).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|by_kind| by_kind.values()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, u64>)> {
        self.counts.iter()
    }
}

/// Record emitted for every successful count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub line: String,
    pub object_id: u64,
    pub kind: Option<String>,
    pub first_position: Point,
    pub counted_position: Point,
    pub frame: u64,
    pub counted_at: DateTime<Utc>,
}

/// Test `blob` against every line it has not been credited for yet.
///
/// Successful crossings increment `counts[line][kind]` and are recorded
/// in the blob's crossed set, so a blob is counted at most once per line.
/// The blob's previous box is refreshed to its current box afterwards.
pub fn attempt_count<T>(
    blob: &mut Blob<T>,
    lines: &[CountingLine],
    counts: &mut CountsTable,
    frame: u64,
) -> Vec<CrossingEvent> {
    let mut events = Vec::new();
    let centroid = blob.centroid();

    for line in lines {
        if blob.has_crossed_line(&line.label) {
            continue;
        }

        if let Some(min_squared) = line.min_displacement_squared() {
            if blob.first_position().distance_squared(&centroid) < min_squared {
                continue;
            }
        }

        let Some(candidates) = lines_for(
            &blob.bounding_box,
            blob.previous_box.as_ref(),
            line.selector,
            line.direction,
        ) else {
            continue;
        };

        if !has_crossed(line, &candidates, blob) {
            continue;
        }

        let kind = blob
            .kind
            .clone()
            .unwrap_or_else(|| UNLABELED_KIND.to_string());
        counts.increment(&line.label, &kind);
        blob.mark_crossed(&line.label);

        let event = CrossingEvent {
            line: line.label.clone(),
            object_id: blob.id,
            kind: blob.kind.clone(),
            first_position: blob.first_position(),
            counted_position: centroid,
            frame,
            counted_at: Utc::now(),
        };
        info!(
            line = %event.line,
            object_id = event.object_id,
            kind = %kind,
            first_x = event.first_position.x,
            first_y = event.first_position.y,
            counted_x = event.counted_position.x,
            counted_y = event.counted_position.y,
            frame = event.frame,
            "object counted"
        );
        events.push(event);
    }

    blob.previous_box = Some(blob.bounding_box);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counting::line::{Direction, Selector};
    use crate::geometry::BoundingBox;

    fn vertical_line(label: &str) -> CountingLine {
        CountingLine::new(label, Point::new(15.0, -5.0), Point::new(15.0, 25.0))
    }

    fn blob_at(bbox: BoundingBox) -> Blob<()> {
        Blob::new(7, bbox, Some("car".to_string()), Some(0.8), ())
    }

    #[test]
    fn test_counts_once_per_line() {
        let lines = vec![vertical_line("a")];
        let mut counts = CountsTable::for_lines(&lines);
        let mut blob = blob_at(BoundingBox::new(10.0, 0.0, 10.0, 10.0));

        let first = attempt_count(&mut blob, &lines, &mut counts, 0);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].object_id, 7);

        for frame in 1..5 {
            blob.bounding_box.x += 1.0;
            assert!(attempt_count(&mut blob, &lines, &mut counts, frame).is_empty());
        }
        assert_eq!(counts.get("a", "car"), 1);
        assert_eq!(blob.lines_crossed().to_vec(), vec!["a".to_string()]);
    }

    #[test]
    fn test_previous_box_refreshed() {
        let lines = vec![vertical_line("a").with_selector(Selector::Centroid)];
        let mut counts = CountsTable::for_lines(&lines);
        let start = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let mut blob = blob_at(start);

        assert!(attempt_count(&mut blob, &lines, &mut counts, 0).is_empty());
        assert_eq!(blob.previous_box, Some(start));

        blob.bounding_box = BoundingBox::new(20.0, 0.0, 10.0, 10.0);
        assert_eq!(attempt_count(&mut blob, &lines, &mut counts, 1).len(), 1);
        assert_eq!(blob.previous_box, Some(blob.bounding_box));
    }

    #[test]
    fn test_min_displacement_gates_count() {
        let lines = vec![
            vertical_line("a")
                .with_selector(Selector::Centroid)
                .with_min_displacement(50.0),
        ];
        let mut counts = CountsTable::for_lines(&lines);

        // First position centroid (10, 5); moves 10 px across x = 15.
        let mut blob = blob_at(BoundingBox::new(5.0, 0.0, 10.0, 10.0));
        attempt_count(&mut blob, &lines, &mut counts, 0);
        blob.bounding_box = BoundingBox::new(15.0, 0.0, 10.0, 10.0);
        assert!(attempt_count(&mut blob, &lines, &mut counts, 1).is_empty());
        assert_eq!(counts.line_total("a"), 0);
    }

    #[test]
    fn test_unlabeled_kind_key() {
        let lines = vec![vertical_line("a")];
        let mut counts = CountsTable::for_lines(&lines);
        let mut blob: Blob<()> =
            Blob::new(1, BoundingBox::new(10.0, 0.0, 10.0, 10.0), None, None, ());
        let events = attempt_count(&mut blob, &lines, &mut counts, 3);
        assert_eq!(events[0].kind, None);
        assert_eq!(events[0].frame, 3);
        assert_eq!(counts.get("a", UNLABELED_KIND), 1);
    }

    #[test]
    fn test_direction_filter_requires_motion() {
        let lines = vec![vertical_line("a").with_direction(Direction::Left)];
        let mut counts = CountsTable::for_lines(&lines);
        let mut blob = blob_at(BoundingBox::new(10.0, 0.0, 10.0, 10.0));
        assert!(attempt_count(&mut blob, &lines, &mut counts, 0).is_empty());
    }

    #[test]
    fn test_counts_table_totals() {
        let mut counts = CountsTable::new();
        counts.increment("a", "car");
        counts.increment("a", "car");
        counts.increment("a", "bus");
        counts.increment("b", "car");
        assert_eq!(counts.get("a", "car"), 2);
        assert_eq!(counts.line_total("a"), 3);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get("c", "car"), 0);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"a":{"bus":1,"car":2},"b":{"car":1}}"#);
    }
}
