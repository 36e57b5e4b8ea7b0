pub mod allocated_flight;
pub mod allocation_state;
pub mod allocator;
pub mod dual_pass;
pub mod greedy;
pub mod hour_slot;
pub mod options;
pub mod policy;
pub mod selective;
