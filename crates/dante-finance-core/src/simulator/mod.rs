pub mod payment_comparison;
