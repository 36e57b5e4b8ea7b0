pub mod capacity_event;
pub mod capacity_schedule;
