// src/lib.rs
pub mod audiogram;
pub mod config;
pub use audiogram::*;
