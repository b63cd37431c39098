//! The wgpu device and the window surface it presents to.
//!
//! Each frame acquires one [`GpuFrame`]; the compute pass and the render pass
//! are both recorded into its encoder and submitted together.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceRecovery;
