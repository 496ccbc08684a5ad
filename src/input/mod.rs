mod error;
mod table;

pub use error::InputError;
pub use table::InputTable;
