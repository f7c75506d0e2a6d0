pub mod booking_lifecycle;
pub mod rule_overlay;
pub mod slot_slicer;

pub use booking_lifecycle::*;
pub use rule_overlay::{reduce, BlockedWindow, DayWindows};
pub use slot_slicer::slice;
