pub mod start;
pub mod status;
pub mod usage;
