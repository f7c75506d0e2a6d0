pub mod blocked_date;
pub mod booking;
pub mod calendar;
pub mod holiday;
pub mod settings;
pub mod slot;
pub mod time_rule;
pub mod walker;
pub mod wall_time;

pub use blocked_date::*;
pub use booking::*;
pub use calendar::*;
pub use holiday::*;
pub use settings::BookingSettings;
pub use slot::*;
pub use time_rule::*;
pub use walker::*;
pub use wall_time::*;
