pub mod detections;
pub mod records;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
