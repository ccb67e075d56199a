pub mod amortization;
pub mod simulator;
