pub mod candle;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod extension;
pub mod indicator;
pub mod model;
pub mod noise_window;
pub mod params;
pub mod runtime;
pub mod session;
pub mod strategy;
pub mod volume_trend;
