// Wine Load Generator - Library root for testing

pub mod config;
pub mod error;
pub mod metrics;
pub mod mock_server;
pub mod runner;
pub mod sample;
pub mod worker;
