//! Resume ranking service: job field extraction, skill-vector resume ranking,
//! and the HTTP and batch surfaces around them.

pub mod config;
pub mod errors;
pub mod extraction;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod state;
