mod error;
pub mod fixed;
pub mod speed;
pub mod timestamp;

pub use error::ConversionError;
