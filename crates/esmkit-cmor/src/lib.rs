pub mod cmip5;
pub mod cmip6;
pub mod config;
pub mod info;
pub mod table;

pub mod error;

mod fsutil;

// Re-export the handful of items almost every caller needs
pub use cmip5::load_cmip5_tables;
pub use cmip6::load_cmip6_tables;
pub use config::{ProjectTables, TableFormat, TablesConfig};
pub use error::{TableError, TableResult};
pub use info::{CoordinateInfo, VariableInfo, NO_AXIS, VALID_AXES};
pub use table::TableSet;
