// Adapters layer: concrete implementations of the domain ports.

pub mod csv_table;
pub mod memory;
pub mod storage;

pub use csv_table::{CsvTableSink, CsvTableSource};
pub use memory::{MemorySink, MemorySource};
pub use storage::LocalStorage;
