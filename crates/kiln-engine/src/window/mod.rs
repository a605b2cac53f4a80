//! Windowed runtime.
//!
//! Owns the winit event loop and the window/render-system pair, and drives
//! an [`App`](runtime::App) once per redraw.

mod runtime;

pub use runtime::{App, AppControl, FrameCtx, Runtime, RuntimeConfig};
