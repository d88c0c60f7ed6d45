// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Rendering test case batches to CSV and reading exports back

mod csv_parser;
mod csv_writer;

pub use csv_parser::CsvParser;
pub use csv_writer::CsvExporter;
