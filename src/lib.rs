pub mod aggregate;
pub mod cli;
pub mod error;
pub mod ingest;
pub mod model;
pub mod names;
pub mod parser;
