//! Common utilities for physics simulations
//!
//! This crate provides shared graphics setup, the perspective camera, and buffer helpers
//! used by the simulation front-ends in this workspace.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
