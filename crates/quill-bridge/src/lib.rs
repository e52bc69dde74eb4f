//! Hosts an embeddable editing engine inside an application that exposes its
//! platform as a C callback table.
//!
//! The host supplies a [`HostInterface`] (fonts, text measurement, drawing,
//! clipboard). The bridge implements the engine's platform layer on top of
//! it, translates host input into engine events and exposes one
//! [`EditorInstance`] per editor. Each instance operation binds the host to
//! the calling thread for its duration (see [`context`]), which is how
//! engine callbacks deep inside a paint or key press find it.
//!
//! Invariant violations (double binding, unsupported drawing primitives, a
//! clipboard that changes size between fetches) are fatal; see
//! [`invariant!`] and [`fatal!`].

pub mod adapter;
pub mod clipboard;
pub mod color;
pub mod context;
pub mod editor;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod logging;
pub mod native;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use adapter::{DisplayMetrics, Font, SurfaceAdapter, WindowGeometry};
pub use clipboard::ClipboardBridge;
pub use color::{ColourDesired, HostColor};
pub use editor::EditorInstance;
pub use engine::{EditorEngine, EngineHooks, KeyCode, Modifiers, SelectionAccess, Surface};
pub use error::{BridgeError, Result};
pub use geometry::{HostRect, PRectangle, Point};
pub use host::{BufferAllocator, HostAllocator, HostHandle, HostInterface, HostString};
pub use native::{HostCallbacks, NativeHost};
pub use quill_config::QuillConfig;
