//! Core library for the hbt habit-tracker client.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod session;
