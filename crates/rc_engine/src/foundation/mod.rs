//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Stable handles for arena-backed collections
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
