pub mod anchoring;
pub mod gesture;
