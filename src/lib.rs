pub mod config;
pub mod logging;
pub mod model;
pub mod output;
pub mod roster;
pub mod scoring;
pub mod store;
