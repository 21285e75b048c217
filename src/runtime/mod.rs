pub mod dataset_cache;
pub mod engine_registry;
