pub mod api;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod logging;
pub mod output;
pub mod scoring;
