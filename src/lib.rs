// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod error;
pub mod file;
pub mod net;
pub mod params;
pub mod preprocess;
pub mod progress;
pub mod runner;
pub mod worker;
