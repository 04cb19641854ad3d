//! Frame-level tests across the scene, sprite batch and batch renderer

mod errors;
