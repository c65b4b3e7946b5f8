pub mod traits;

// Source implementations
pub mod memory;
