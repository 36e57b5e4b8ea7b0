pub mod airport;
pub mod allocation;
pub mod capacity;
pub mod compliance;
pub mod flight;
pub mod regulation;
pub mod simulation;
pub mod utils;
