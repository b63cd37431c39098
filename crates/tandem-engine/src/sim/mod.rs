//! GPU simulation core.
//!
//! A simulation keeps its elements in two equally sized device buffers. Each
//! compute dispatch reads one and writes the other; the step counter's parity
//! says which one is authoritative. Bind groups for both orientations are
//! built once and selected by parity, never rebuilt per frame.
//!
//! Pieces, leaves first:
//! - [`handle`] / [`host`]: buffer identity and the allocator seam
//! - [`ping_pong`]: the double-buffered pair and its step counter
//! - [`bind_sets`]: the two immutable bind groups per pipeline
//! - [`compute`] / [`render`]: stages recording into a pass
//! - [`object`]: the scene-object lifecycle contract

pub mod bind_sets;
pub mod channel;
pub mod compute;
pub mod control;
pub mod encoder;
mod error;
pub mod handle;
pub mod host;
pub mod mirror;
pub mod object;
pub mod ping_pong;
pub mod record;
pub mod render;
pub mod workgroups;

pub use bind_sets::{BindSets, BindSlots, Orientation};
pub use channel::{input_channel, InputChannel, LightKind, ShadingMode, SimAction, SimInput};
pub use compute::{ComputeStage, DispatchOutcome};
pub use control::SimControl;
pub use encoder::{ComputeEncoder, DrawEncoder};
pub use error::SimError;
pub use handle::{Allocator, BufferDesc, GpuBuffer, ResourceHandle, ResourceId, WgpuAllocator};
pub use host::{HostAllocator, HostBuffer};
pub use mirror::{Element, HostMirror};
pub use object::{initialize, Lifecycle, LifecycleTracker, SceneObject};
pub use ping_pong::DoubleBuffered;
pub use record::{CommandLog, Recorded};
pub use render::{DrawShape, RenderStage};
pub use workgroups::{BlockSize, Domain, Workgroups};
