pub mod chart;
pub mod metrics;
pub mod movement;
pub mod query;
pub mod settings;
