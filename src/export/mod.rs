pub mod csv;

pub use csv::export_all;
