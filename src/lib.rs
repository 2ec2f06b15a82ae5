//! The EGL display registry of an emulator's GL translation layer.
//!
//! A `Display` owns everything a guest creates through one EGL display connection: the frozen
//! table of framebuffer configs, the contexts, surfaces and images handed out by handle, the
//! per-version GL object name managers, and the lazily created global shared context that every
//! client context shares with. Native work is delegated to a `platform::Driver`.
//!
//! Displays are safe to use from any number of threads. Handles never alias: a handle that has
//! been removed never resolves again, even after its slot is reused.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod egl;

pub mod platform;
pub use crate::platform::{Driver, InternalDisplay, NativeConfig, NativeConfigInfo};
pub use crate::platform::{NativeContext, NativeDisplay, NativeImage, NativePixmap};
pub use crate::platform::{NativeSurface, NativeWindow, OwnedNative};

pub mod error;
pub use crate::error::{Error, WindowingApiError};

mod config;
pub use crate::config::{ColorBufferType, Config, ConfigAttributes, ConfigCaveat};
pub use crate::config::{ConfigTemplate, RenderableType, SurfaceTypeMask};

mod connection;
pub use crate::connection::Connection;

mod context;
pub use crate::context::{Context, ContextID};

mod display;
pub use crate::display::{Display, DisplayState};

mod handle;
pub use crate::handle::{ConfigHandle, ContextHandle, ImageHandle, SurfaceHandle};

mod image;
pub use crate::image::Image;

mod info;
pub use crate::info::{GLESVersion, MAX_GLES_VERSION};

mod names;
pub use crate::names::{GlobalNameSpace, NamedObjectType, ObjectNameManager};
pub use crate::names::{ShareGroup, ShareGroupID};

mod stream;
pub use crate::stream::InplaceStream;

mod surface;
pub use crate::surface::{Surface, SurfaceID, SurfaceKind};

mod table;

#[cfg(all(test, feature = "sm-headless"))]
mod tests;
