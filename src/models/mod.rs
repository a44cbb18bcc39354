pub mod catalog;
pub mod config;

pub use catalog::{CatalogFile, CatalogPaint, PaintSetDefinition, StoreBoughtPaintSet};
pub use config::{AppConfig, SearchDefaults, WorkerConfig};
