pub mod components;
pub mod config;
pub mod error;
pub mod scheduling;
pub mod service;
pub mod utils;
