//! Tandem engine crate.
//!
//! Platform + GPU runtime pieces, the double-buffered simulation core
//! (`sim`) and the scene objects built on it (`scene`).

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;

pub mod sim;
pub mod scene;
