//! Fraud heuristics

pub mod rules;

pub use rules::{FraudIndicator, FraudRules};
