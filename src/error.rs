// emugl-egl/src/error.rs
//
//! Various errors that registry methods can produce.
//!
//! Unknown handles are not errors: lookups return `None`, removals return `false` and config
//! searches return a zero count.

use std::fmt::{self, Display, Formatter};

/// Various errors that registry methods can produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// The display has not been initialized, or has been terminated.
    NotInitialized,
    /// The driver refused to enumerate framebuffer configurations.
    DriverRefused(WindowingApiError),
    /// The driver couldn't create a native context.
    ///
    /// When this comes from `Display::global_shared_context()`, no further context can be created
    /// on the display and the caller should treat it as fatal.
    ContextCreationFailed(WindowingApiError),
    /// The driver couldn't create a native surface.
    SurfaceCreationFailed(WindowingApiError),
    /// The driver couldn't create a native image.
    ImageCreationFailed(WindowingApiError),
    /// Every image id of this display has been handed out. This is fatal.
    ImageIdsExhausted,
    /// Every GL object name of a type has been handed out.
    NamesExhausted,
    /// The requested GLES version has no name manager.
    UnsupportedGLESVersion,
    /// An attribute list contained an unknown attribute or an out-of-range value.
    BadAttribute,
    /// The config handle doesn't name a config of this display.
    NoSuchConfig,
    /// The config doesn't support the requested kind of surface.
    IncompatibleConfig,
    /// The shared context was created for a different GLES version.
    IncompatibleSharedContext,
    /// The context handle doesn't name a live context of this display.
    NoSuchContext,
    /// The GL object name is unknown to the share group.
    NoSuchName,
    /// The image handle doesn't name a live image of this display.
    NoSuchImage,
}

/// Abstraction of the errors that a native EGL driver returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowingApiError {
    /// Miscellaneous error.
    Failed,
    /// EGL is not initialized, or could not be initialized, for the specified EGL display
    /// connection.
    NotInitialized,
    /// EGL cannot access a requested resource (for example a context is bound in another thread).
    BadAccess,
    /// EGL failed to allocate resources for the requested operation.
    BadAlloc,
    /// An unrecognized attribute or attribute value was passed in the attribute list.
    BadAttribute,
    /// An EGLConfig argument does not name a valid EGL frame buffer configuration.
    BadConfig,
    /// An EGLContext argument does not name a valid EGL rendering context.
    BadContext,
    /// An EGLDisplay argument does not name a valid EGL display connection.
    BadDisplay,
    /// An EGLSurface argument does not name a valid surface configured for GL rendering.
    BadSurface,
    /// Arguments are inconsistent (for example, a valid context requires buffers not supplied by
    /// a valid surface).
    BadMatch,
    /// One or more argument values are invalid.
    BadParameter,
    /// A NativePixmapType argument does not refer to a valid native pixmap.
    BadNativePixmap,
    /// A NativeWindowType argument does not refer to a valid native window.
    BadNativeWindow,
    /// A power management event has occurred.
    ContextLost,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Error::NotInitialized => f.write_str("the display is not initialized"),
            Error::DriverRefused(err) => {
                write!(f, "the driver refused to enumerate configs: {}", err)
            }
            Error::ContextCreationFailed(err) => {
                write!(f, "the driver couldn't create a context: {}", err)
            }
            Error::SurfaceCreationFailed(err) => {
                write!(f, "the driver couldn't create a surface: {}", err)
            }
            Error::ImageCreationFailed(err) => {
                write!(f, "the driver couldn't create an image: {}", err)
            }
            Error::ImageIdsExhausted => f.write_str("no image ids are left on this display"),
            Error::NamesExhausted => f.write_str("no GL object names of this type are left"),
            Error::UnsupportedGLESVersion => f.write_str("unsupported GLES version"),
            Error::BadAttribute => f.write_str("invalid config attribute list"),
            Error::NoSuchConfig => f.write_str("unknown config"),
            Error::IncompatibleConfig => {
                f.write_str("the config doesn't support the requested surface type")
            }
            Error::IncompatibleSharedContext => {
                f.write_str("the shared context has a different GLES version")
            }
            Error::NoSuchContext => f.write_str("unknown context"),
            Error::NoSuchName => f.write_str("unknown GL object name"),
            Error::NoSuchImage => f.write_str("unknown image"),
        }
    }
}

impl std::error::Error for WindowingApiError {}

impl Display for WindowingApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            WindowingApiError::Failed => "failed",
            WindowingApiError::NotInitialized => "EGL_NOT_INITIALIZED",
            WindowingApiError::BadAccess => "EGL_BAD_ACCESS",
            WindowingApiError::BadAlloc => "EGL_BAD_ALLOC",
            WindowingApiError::BadAttribute => "EGL_BAD_ATTRIBUTE",
            WindowingApiError::BadConfig => "EGL_BAD_CONFIG",
            WindowingApiError::BadContext => "EGL_BAD_CONTEXT",
            WindowingApiError::BadDisplay => "EGL_BAD_DISPLAY",
            WindowingApiError::BadSurface => "EGL_BAD_SURFACE",
            WindowingApiError::BadMatch => "EGL_BAD_MATCH",
            WindowingApiError::BadParameter => "EGL_BAD_PARAMETER",
            WindowingApiError::BadNativePixmap => "EGL_BAD_NATIVE_PIXMAP",
            WindowingApiError::BadNativeWindow => "EGL_BAD_NATIVE_WINDOW",
            WindowingApiError::ContextLost => "EGL_CONTEXT_LOST",
        })
    }
}

pub(crate) trait ToWindowingApiError {
    fn to_windowing_api_error(self) -> WindowingApiError;
}

impl ToWindowingApiError for crate::egl::EGLint {
    fn to_windowing_api_error(self) -> WindowingApiError {
        use crate::egl;
        match self {
            egl::NOT_INITIALIZED => WindowingApiError::NotInitialized,
            egl::BAD_ACCESS => WindowingApiError::BadAccess,
            egl::BAD_ALLOC => WindowingApiError::BadAlloc,
            egl::BAD_ATTRIBUTE => WindowingApiError::BadAttribute,
            egl::BAD_CONFIG => WindowingApiError::BadConfig,
            egl::BAD_CONTEXT => WindowingApiError::BadContext,
            egl::BAD_DISPLAY => WindowingApiError::BadDisplay,
            egl::BAD_SURFACE => WindowingApiError::BadSurface,
            egl::BAD_MATCH => WindowingApiError::BadMatch,
            egl::BAD_PARAMETER => WindowingApiError::BadParameter,
            egl::BAD_NATIVE_PIXMAP => WindowingApiError::BadNativePixmap,
            egl::BAD_NATIVE_WINDOW => WindowingApiError::BadNativeWindow,
            egl::CONTEXT_LOST => WindowingApiError::ContextLost,
            _ => WindowingApiError::Failed,
        }
    }
}
