//! Infrastructure implementations.
//!
//! Contains the store port, its in-memory adapter, and engine configuration.

pub mod config;
pub mod memory_store;
pub mod ports;
