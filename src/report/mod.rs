pub mod assembler;
mod sink;
mod types;
mod warning;

pub use assembler::assemble;
pub use sink::{CsvDirSink, JsonSink, ReportSink, SinkError};
