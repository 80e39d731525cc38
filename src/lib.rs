pub mod batches;
pub mod cache;
pub mod calendar;
pub mod charts;
pub mod columns;
pub mod dashboard;
pub mod dataset;
pub mod exceptions;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod settings;
pub mod transformers;
