//! Line-crossing counting engine.

mod candidates;
mod counter;
mod crossing;
mod line;

pub use candidates::lines_for;
pub use counter::{CountsTable, CrossingEvent, UNLABELED_KIND, attempt_count};
pub use crossing::has_crossed;
pub use line::{Basis, CountingLine, Direction, Mode, Selector};
