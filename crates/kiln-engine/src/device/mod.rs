//! GPU device + surface management.
//!
//! This module owns the wgpu Instance/Adapter/Device/Queue, configures the
//! surface (swapchain), and hands out frames for the render context to
//! record into.

mod system;

pub use system::{Frame, RenderSystem, SurfaceErrorAction, SystemInit};
