//! Immediate-mode rendering over the acquired frame.
//!
//! The [`RenderContext`] is a thin wrapper around the frame's command
//! encoder: clears and draws are recorded in call order, one small render
//! pass per call. Pipelines and buffers are owned by the caller.

mod context;
pub mod flat;

pub use context::RenderContext;

bitflags::bitflags! {
    /// Which planes of the render target a clear applies to.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ClearOptions: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}
