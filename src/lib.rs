//! roomcast server library.
//! This crate exposes internal modules for integration testing.
//! The binary entry point is in main.rs.

pub mod api;
pub mod config;
pub mod rooms;
pub mod routes;
pub mod state;
