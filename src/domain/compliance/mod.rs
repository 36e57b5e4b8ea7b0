pub mod compliance_simulator;
