//! Core library for the cleanhub home-cleaning marketplace service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
