// src/lib.rs

//! Homework status notifier library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
