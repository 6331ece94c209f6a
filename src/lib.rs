// Gemcrow: caching proxy for RubyGems-style package registries

pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod origin;
pub mod pipeline;
pub mod proxy;
pub mod store;
pub mod views;
