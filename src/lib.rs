//! Sport News CLI Library
//!
//! This module exposes the controller, cache, CLI and news client for use in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod news;
