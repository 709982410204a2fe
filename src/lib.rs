pub mod caller;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repository;
pub mod spreadsheet;
pub mod telemetry;
pub mod workflows;
