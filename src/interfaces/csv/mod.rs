pub mod address_reader;
pub mod results_writer;
