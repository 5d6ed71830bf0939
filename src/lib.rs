pub mod api;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod state;
pub mod storage;
pub mod story;
pub mod vision;

#[cfg(test)]
mod test_support;
