pub mod blocked_dates;
pub mod bookings;
pub mod holidays;
pub mod rules;
pub mod settings;
pub mod slots;
