use nalgebra::Vector2;

use crate::counting::line::{Basis, CountingLine, Mode};
use crate::geometry::{Segment, segments_intersect};
use crate::tracker::Blob;

/// Decide whether `blob` crossed `line`, given candidate segments built
/// for the line's selector.
///
/// The first intersecting candidate decides the outcome. Without a
/// direction filter it counts immediately; with one, the direction of
/// motion must fall on the configured side of the line. Every candidate
/// describes the same motion, so a direction mismatch on the first hit
/// is final.
pub fn has_crossed<T>(line: &CountingLine, candidates: &[Segment], blob: &Blob<T>) -> bool {
    let mode = line.mode();
    for candidate in candidates {
        let (intersects, side) = segments_intersect(&line.segment, candidate);
        if !intersects {
            continue;
        }
        if !line.direction.is_filtered() {
            return true;
        }
        let sign = motion_sign(line, mode, side, blob);
        return sign * line.direction.sign() > 0;
    }
    false
}

/// Side of the line the motion heads towards: `1` left, `-1` right, `0` along it.
fn motion_sign<T>(line: &CountingLine, mode: Mode, side: i8, blob: &Blob<T>) -> i8 {
    let line_vector = line.segment.vector();
    match (line.basis, mode) {
        (Basis::Previous, Mode::Cross) => side,
        (Basis::Previous, Mode::Touch) => match &blob.previous_box {
            Some(previous) => cross_sign(
                &previous.centroid().vector_to(&blob.centroid()),
                &line_vector,
            ),
            None => 0,
        },
        (Basis::First, _) => cross_sign(
            &blob.first_position().vector_to(&blob.centroid()),
            &line_vector,
        ),
    }
}

fn cross_sign(motion: &Vector2<f64>, line: &Vector2<f64>) -> i8 {
    let cross = motion.perp(line);
    if cross > 0.0 {
        1
    } else if cross < 0.0 {
        -1
    } else {
        0
    }
}
