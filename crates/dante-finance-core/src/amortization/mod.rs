pub mod level_payment;
pub mod schedule;
