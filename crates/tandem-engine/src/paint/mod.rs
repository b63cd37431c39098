//! Color values used for clears and shader uniforms.

pub mod color;

pub use color::Color;
