pub mod demand;
pub mod flight;
