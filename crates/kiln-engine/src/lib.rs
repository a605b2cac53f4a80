//! Kiln engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by higher layers:
//! the wgpu render system, the immediate-mode render context, the windowed
//! runtime, and the math primitives shared across them.

pub mod device;
pub mod logging;
pub mod math;
pub mod render;
pub mod window;
