// emugl-egl/src/surface.rs
//
//! Drawable surface records.

use crate::config::SurfaceTypeMask;
use crate::handle::ConfigHandle;
use crate::platform::{NativePixmap, NativeSurface, NativeWindow, OwnedNative};

use euclid::default::Size2D;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceID(pub usize);

impl Display for SurfaceID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", *self)
    }
}

static NEXT_SURFACE_ID: AtomicUsize = AtomicUsize::new(1);

/// What a surface draws into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceKind {
    /// An on-screen OS window.
    Window { native_window: NativeWindow },
    /// An off-screen buffer of the given size.
    Pbuffer { size: Size2D<i32> },
    /// An OS pixmap.
    Pixmap { native_pixmap: NativePixmap },
}

impl SurfaceKind {
    /// The `EGL_SURFACE_TYPE` bit a config must have to back this kind of surface.
    pub fn required_surface_type(&self) -> SurfaceTypeMask {
        match *self {
            SurfaceKind::Window { .. } => SurfaceTypeMask::WINDOW,
            SurfaceKind::Pbuffer { .. } => SurfaceTypeMask::PBUFFER,
            SurfaceKind::Pixmap { .. } => SurfaceTypeMask::PIXMAP,
        }
    }
}

/// A drawable. Shared the same way as contexts; the native surface is destroyed with the last
/// share.
#[derive(Debug)]
pub struct Surface {
    id: SurfaceID,
    kind: SurfaceKind,
    config: ConfigHandle,
    native: OwnedNative<NativeSurface>,
}

impl Surface {
    pub fn new(kind: SurfaceKind, config: ConfigHandle, native: OwnedNative<NativeSurface>)
               -> Surface {
        Surface {
            id: SurfaceID(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed)),
            kind,
            config,
            native,
        }
    }

    #[inline]
    pub fn id(&self) -> SurfaceID {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    #[inline]
    pub fn config(&self) -> ConfigHandle {
        self.config
    }

    #[inline]
    pub fn native_surface(&self) -> NativeSurface {
        self.native.raw()
    }
}
