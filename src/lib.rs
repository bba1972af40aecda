pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;
pub mod services;
pub mod stores;
pub mod utils;
