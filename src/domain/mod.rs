pub mod catalog;
pub mod error;
pub mod options;
pub mod report;
pub mod schema;
pub mod types;
pub mod value_path;
