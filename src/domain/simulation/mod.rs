pub mod simulation;
pub mod statistics;
