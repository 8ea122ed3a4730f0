//! Labforma — schema-driven lab-report engine.
//!
//! Report types and their fields are data, not code: a fixed engine
//! validates submissions against stored field definitions, derives a
//! completion status, and persists values as one row per filled field.
//! The HTTP boundary, authentication and patient registration live in the
//! embedding application; this crate exposes the engine and its storage.

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod report;
