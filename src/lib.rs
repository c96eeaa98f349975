//! Glimpse Server Library
//!
//! This crate exposes the search core for benchmarking and testing.
//! The server binary is in main.rs.
//!
//! # Modules
//!
//! - `annotations`: recognized-word model (text + bounding box)
//! - `search`: query parsing, fuzzy matching, corpus evaluation
//! - `db`: image records and their SQLite persistence

pub mod annotations;
pub mod config;
pub mod db;
pub mod error;
pub mod ocr;
pub mod search;
pub mod storage;
