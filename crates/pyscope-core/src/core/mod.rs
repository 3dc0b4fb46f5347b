pub mod commands;
pub mod config;
pub mod fs;
pub mod project;
pub mod python;
pub mod runtime;
pub mod tooling;
pub mod tools;
