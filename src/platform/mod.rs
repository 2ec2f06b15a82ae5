// emugl-egl/src/platform/mod.rs
//
//! The seam between the registry and the native EGL implementation.
//!
//! The registry never calls EGL itself. Everything native goes through a `Driver`, and every
//! native object a record owns is destroyed through the driver that created it.

use crate::config::{ConfigAttributes, RenderableType};
use crate::{GLESVersion, WindowingApiError};

use euclid::default::Size2D;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

#[cfg(feature = "sm-headless")]
pub mod headless;

macro_rules! declare_native_handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub usize);
    };
}

declare_native_handle!(
    /// The OS-supplied display connection.
    NativeDisplay
);
declare_native_handle!(
    /// The translator-side display the driver operates on.
    InternalDisplay
);
declare_native_handle!(
    /// A driver framebuffer configuration.
    NativeConfig
);
declare_native_handle!(
    /// A driver rendering context.
    NativeContext
);
declare_native_handle!(
    /// A driver surface.
    NativeSurface
);
declare_native_handle!(
    /// An OS window a window surface draws into.
    NativeWindow
);
declare_native_handle!(
    /// An OS pixmap a pixmap surface draws into.
    NativePixmap
);
declare_native_handle!(
    /// A driver image object.
    NativeImage
);

/// A config as the driver enumerates it.
#[derive(Clone, Debug)]
pub struct NativeConfigInfo {
    pub native: NativeConfig,
    pub attributes: ConfigAttributes,
}

/// The native EGL implementation a display sits on.
///
/// Drivers are shared between threads; every method may be called concurrently.
pub trait Driver: Send + Sync {
    /// Enumerates the framebuffer configs of `display` usable with `renderable_type`.
    fn query_configs(&self, display: InternalDisplay, renderable_type: RenderableType)
                     -> Result<Vec<NativeConfigInfo>, WindowingApiError>;

    /// Creates a context. `config` is `None` only for the global shared context of a display
    /// whose driver exposes no configs.
    fn create_context(&self,
                      display: InternalDisplay,
                      config: Option<NativeConfig>,
                      share_with: Option<NativeContext>,
                      version: GLESVersion)
                      -> Result<NativeContext, WindowingApiError>;

    fn destroy_context(&self, display: InternalDisplay, context: NativeContext);

    fn create_pbuffer_surface(&self,
                              display: InternalDisplay,
                              config: NativeConfig,
                              size: Size2D<i32>)
                              -> Result<NativeSurface, WindowingApiError>;

    fn create_window_surface(&self,
                             display: InternalDisplay,
                             config: NativeConfig,
                             window: NativeWindow)
                             -> Result<NativeSurface, WindowingApiError>;

    fn create_pixmap_surface(&self,
                             display: InternalDisplay,
                             config: NativeConfig,
                             pixmap: NativePixmap)
                             -> Result<NativeSurface, WindowingApiError>;

    fn destroy_surface(&self, display: InternalDisplay, surface: NativeSurface);

    /// Creates an image backed by the host texture `global_texture` of `context`.
    fn create_image(&self,
                    display: InternalDisplay,
                    context: NativeContext,
                    global_texture: u32)
                    -> Result<NativeImage, WindowingApiError>;

    fn destroy_image(&self, display: InternalDisplay, image: NativeImage);
}

/// Native objects that a record can own.
pub trait NativeObject: Copy + Debug + Send + Sync + 'static {
    fn destroy(self, driver: &dyn Driver, display: InternalDisplay);
}

impl NativeObject for NativeContext {
    fn destroy(self, driver: &dyn Driver, display: InternalDisplay) {
        driver.destroy_context(display, self)
    }
}

impl NativeObject for NativeSurface {
    fn destroy(self, driver: &dyn Driver, display: InternalDisplay) {
        driver.destroy_surface(display, self)
    }
}

impl NativeObject for NativeImage {
    fn destroy(self, driver: &dyn Driver, display: InternalDisplay) {
        driver.destroy_image(display, self)
    }
}

/// A native object together with the driver that destroys it on drop.
pub struct OwnedNative<H: NativeObject> {
    driver: Arc<dyn Driver>,
    display: InternalDisplay,
    raw: H,
}

impl<H: NativeObject> OwnedNative<H> {
    /// Takes ownership of `raw`, which must have been created by `driver` on `display`.
    pub fn new(driver: Arc<dyn Driver>, display: InternalDisplay, raw: H) -> OwnedNative<H> {
        OwnedNative { driver, display, raw }
    }

    #[inline]
    pub fn raw(&self) -> H {
        self.raw
    }
}

impl<H: NativeObject> Drop for OwnedNative<H> {
    fn drop(&mut self) {
        trace!("destroying native object {:?}", self.raw);
        self.raw.destroy(&*self.driver, self.display);
    }
}

impl<H: NativeObject> Debug for OwnedNative<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "OwnedNative({:?})", self.raw)
    }
}
