use crate::counting::line::{Direction, Mode, Selector};
use crate::geometry::{BoundingBox, Segment};

/// Build the candidate segments a counting line is tested against.
///
/// Touch selectors yield edges of `bbox`; cross selectors yield motion
/// segments from `previous` to `bbox`. Returns `None` when the selector
/// needs motion (cross mode, or touch mode with a direction filter) and
/// there is no distinct previous box yet.
pub fn lines_for(
    bbox: &BoundingBox,
    previous: Option<&BoundingBox>,
    selector: Selector,
    direction: Direction,
) -> Option<Vec<Segment>> {
    let mode = selector.mode();
    let needs_motion = mode == Mode::Cross || direction.is_filtered();
    let previous = previous.filter(|p| *p != bbox);
    if needs_motion && previous.is_none() {
        return None;
    }

    let segments = match (mode, previous) {
        (Mode::Touch, _) => touch_lines(bbox, selector),
        (Mode::Cross, Some(previous)) => cross_lines(bbox, previous, selector),
        (Mode::Cross, None) => return None,
    };
    Some(segments)
}

fn touch_lines(bbox: &BoundingBox, selector: Selector) -> Vec<Segment> {
    match selector {
        Selector::Top => vec![bbox.top_edge()],
        Selector::Right => vec![bbox.right_edge()],
        Selector::Left => vec![bbox.left_edge()],
        Selector::Bottom => vec![bbox.bottom_edge()],
        _ => bbox.edges().to_vec(),
    }
}

fn cross_lines(bbox: &BoundingBox, previous: &BoundingBox, selector: Selector) -> Vec<Segment> {
    let top_left = Segment::new(previous.top_left(), bbox.top_left());
    let top_right = Segment::new(previous.top_right(), bbox.top_right());
    let bottom_left = Segment::new(previous.bottom_left(), bbox.bottom_left());
    let bottom_right = Segment::new(previous.bottom_right(), bbox.bottom_right());

    match selector {
        Selector::TopLeft => vec![top_left],
        Selector::TopRight => vec![top_right],
        Selector::BottomLeft => vec![bottom_left],
        Selector::BottomRight => vec![bottom_right],
        Selector::Corners => vec![top_left, top_right, bottom_left, bottom_right],
        _ => vec![Segment::new(previous.centroid(), bbox.centroid())],
    }
}
