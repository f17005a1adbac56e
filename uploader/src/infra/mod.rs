pub mod certificates;
pub mod components;
pub mod config;
pub mod errors;
