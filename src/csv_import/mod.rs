//! Bulk import of expenses from CSV files.

mod csv;
mod import_endpoint;

pub use import_endpoint::upload_csv_endpoint;
