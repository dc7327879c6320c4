//! Pure keyword classifiers. Same text in, same answer out, so batch
//! re-classification is always safe to repeat.

pub mod category;
pub mod region;

pub use category::classify;
pub use region::detect_region;
