//! Window-space coordinates.
//!
//! Pointer positions arrive in logical pixels with a top-left origin and
//! +Y down; scene objects only ever see them as NDC.

mod viewport;

pub use viewport::Viewport;
