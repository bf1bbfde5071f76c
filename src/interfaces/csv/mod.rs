//! CSV adapters for batch runs of the CLI.

pub mod command_reader;
pub mod payment_writer;
