//! # seamweld-math
//!
//! Small linear-algebra primitives shared by the mesh, rasterizer,
//! shrinkwrap, and propagation crates:
//!
//! - [`Vec2`] - 2D vectors for UV coordinates and screen-space triangle math
//! - [`Vec3`] - 3D vectors for mesh positions and Lab/XYZ color triplets
//! - [`Mat3`] - 3x3 matrices for color space transforms
//! - [`Mat4`] - 4x4 matrices for mesh transforms
//! - [`barycentric`] - barycentric coordinates and point-in-triangle tests
//! - Interpolation utilities (lerp, smoothstep, remap)
//!
//! # Design
//!
//! This crate wraps [`glam`] types with seamweld-specific functionality.
//! All matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use seamweld_math::{Mat3, Vec3};
//!
//! let rgb_to_xyz = Mat3::from_rows([
//!     [0.4124564, 0.3575761, 0.1804375],
//!     [0.2126729, 0.7151522, 0.0721750],
//!     [0.0193339, 0.1191920, 0.9503041],
//! ]);
//!
//! let rgb = Vec3::new(1.0, 0.5, 0.25);
//! let xyz = rgb_to_xyz * rgb;
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - fast SIMD-accelerated math backing `Vec3`'s glam interop
//!
//! # Used By
//!
//! - `seamweld-mesh` - vertex positions, UV warp
//! - `seamweld-raster` - screen-space edge functions, barycentric weights
//! - `seamweld-shrinkwrap` - proxy grid construction, ray-triangle tests
//! - `seamweld-dmg` - RGB <-> Lab color math

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod barycentric;
mod interp;
mod mat3;
mod mat4;
mod vec2;
mod vec3;

pub use barycentric::*;
pub use interp::*;
pub use mat3::*;
pub use mat4::*;
pub use vec2::*;
pub use vec3::*;

/// Re-export glam types for direct use.
pub mod glam {
    pub use ::glam::{Mat3 as GlamMat3, Mat4 as GlamMat4, Vec3 as GlamVec3, Vec3A};
}
