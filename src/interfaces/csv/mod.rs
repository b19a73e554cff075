//! CSV adapters for the simulation command.

pub mod ledger_writer;
pub mod scenario_reader;
