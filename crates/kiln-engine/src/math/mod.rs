//! Math primitives shared across engine subsystems.
//!
//! Conventions:
//! - Right-handed, +Y up in world space.
//! - All components are `f32`; colors are linear-space RGBA.
//!
//! These types stay wgpu-free so tooling can use them without GPU code.

mod color;
mod vec2;
mod vec3;
mod vec4;

pub use color::LinearColor;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
