pub mod cache;
pub mod error;
pub mod ingestor;
pub mod orchestrator;
pub mod parser;
pub mod processor;
pub mod record;
pub mod report;
pub mod settings;
