pub mod app;
pub mod browse;
pub mod cli;
pub mod config;
pub mod directory;
pub mod filter;
pub mod logging;
pub mod member;
pub mod output;
pub mod pagination;
pub mod runner;
pub mod settings;
pub mod state;
pub mod utils;

#[cfg(test)]
mod tests;
