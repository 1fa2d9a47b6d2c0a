// Library root: re-exports all modules so integration tests and the binary
// share one implementation.

pub mod app;
pub mod cli;
pub mod processor;
pub mod report;
