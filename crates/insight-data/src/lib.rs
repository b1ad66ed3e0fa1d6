//! Data pipeline for forecourt-insights: CSV loading, review enrichment,
//! windowing, aggregation, window comparison and evidence retrieval.

pub mod analysis;
pub mod compare;
pub mod enrich;
pub mod evidence;
pub mod loader;
pub mod metrics;
pub mod window;
