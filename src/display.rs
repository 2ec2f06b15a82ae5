// emugl-egl/src/display.rs
//
//! The per-display registry of configs, contexts, surfaces and images.

use crate::config::{Config, ConfigTable, ConfigTemplate, RenderableType};
use crate::context::Context;
use crate::egl::EGLint;
use crate::handle::{ConfigHandle, ContextHandle, ImageHandle, ImageIdAllocator, SurfaceHandle};
use crate::image::Image;
use crate::names::{GlobalNameSpace, ObjectNameManager};
use crate::platform::{Driver, InternalDisplay, NativeContext, NativeDisplay, NativePixmap};
use crate::platform::{NativeWindow, OwnedNative};
use crate::surface::{Surface, SurfaceKind};
use crate::table::ObjectTable;
use crate::{Error, GLESVersion, WindowingApiError};

use euclid::default::Size2D;
use fnv::FnvHashMap;
use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, OnceLock};

/// Where a display is in its initialize/terminate cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    Uninitialized,
    Initialized,
    Terminated,
}

// Everything the registry lock guards.
struct RegistryState {
    lifecycle: DisplayState,
    contexts: ObjectTable<Context>,
    surfaces: ObjectTable<Surface>,
    images: FnvHashMap<ImageHandle, Arc<Image>>,
    image_ids: ImageIdAllocator,
    global_shared_context: Option<NativeContext>,
}

/// One logical connection to the native EGL implementation, and the registry of everything
/// created on it.
///
/// All methods take `&self` and may be called from any number of threads. Lookups hand out
/// `Arc` shares taken under the registry lock, so a record stays alive for as long as a caller
/// holds it, even after it has been removed from its table or the display has been terminated.
pub struct Display {
    native_display: NativeDisplay,
    internal_display: InternalDisplay,
    is_default: bool,
    driver: Arc<dyn Driver>,
    // Set once, by the first successful initialize(); read without the lock.
    configs: OnceLock<ConfigTable>,
    global_names: Arc<GlobalNameSpace>,
    managers: [ObjectNameManager; crate::MAX_GLES_VERSION],
    state: Mutex<RegistryState>,
}

impl Debug for Display {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Display({:?}, {:?})", self.native_display, self.internal_display)
    }
}

impl Display {
    /// Creates an uninitialized display for the native display `native`, whose driver-side
    /// counterpart is `internal`.
    pub fn new(driver: Arc<dyn Driver>,
               native_display: NativeDisplay,
               internal_display: InternalDisplay,
               is_default: bool)
               -> Display {
        let global_names = Arc::new(GlobalNameSpace::new());
        let managers = GLESVersion::ALL
            .map(|version| ObjectNameManager::new(version, global_names.clone()));
        Display {
            native_display,
            internal_display,
            is_default,
            driver,
            configs: OnceLock::new(),
            global_names,
            managers,
            state: Mutex::new(RegistryState {
                lifecycle: DisplayState::Uninitialized,
                contexts: ObjectTable::new(),
                surfaces: ObjectTable::new(),
                images: FnvHashMap::default(),
                image_ids: ImageIdAllocator::new(),
                global_shared_context: None,
            }),
        }
    }

    #[inline]
    pub fn native_display(&self) -> NativeDisplay {
        self.native_display
    }

    #[inline]
    pub fn internal_display(&self) -> InternalDisplay {
        self.internal_display
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    #[inline]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    // Lifecycle

    /// Loads the configs (only the first time) and marks the display initialized. Does nothing
    /// if the display is already initialized.
    ///
    /// If the driver refuses to enumerate configs, the display is left as it was.
    pub fn initialize(&self, renderable_type: RenderableType) -> Result<(), Error> {
        let mut state = self.state.lock();
        if state.lifecycle == DisplayState::Initialized {
            return Ok(());
        }

        if self.configs.get().is_none() {
            let native_configs = self
                .driver
                .query_configs(self.internal_display, renderable_type)
                .map_err(Error::DriverRefused)?;
            let table = ConfigTable::new(native_configs, renderable_type);
            debug!("{:?}: loaded {} configs", self, table.len());
            let _ = self.configs.set(table);
        }

        state.lifecycle = DisplayState::Initialized;
        debug!("{:?}: initialized", self);
        Ok(())
    }

    /// Empties the context, surface and image tables and marks the display terminated. Records
    /// held elsewhere survive. Does nothing unless the display is initialized.
    pub fn terminate(&self) {
        let drained = {
            let mut state = self.state.lock();
            if state.lifecycle != DisplayState::Initialized {
                return;
            }
            state.lifecycle = DisplayState::Terminated;
            let images: Vec<(ImageHandle, Arc<Image>)> = state.images.drain().collect();
            (state.contexts.drain(), state.surfaces.drain(), images)
        };
        for &(handle, _) in &drained.2 {
            self.global_names.unbind_image(handle);
        }

        debug!("{:?}: terminated, releasing {} contexts, {} surfaces and {} images",
               self,
               drained.0.len(),
               drained.1.len(),
               drained.2.len());
        // Records whose last share this was are destroyed here, outside the lock.
        drop(drained);
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().lifecycle == DisplayState::Initialized
    }

    pub fn state(&self) -> DisplayState {
        self.state.lock().lifecycle
    }

    // Configs

    /// The number of configs. Zero until the display is first initialized.
    pub fn config_count(&self) -> usize {
        self.configs.get().map_or(0, ConfigTable::len)
    }

    /// Writes up to `out.len()` config handles in table order and returns how many were written.
    pub fn list_configs(&self, out: &mut [ConfigHandle]) -> usize {
        self.configs.get().map_or(0, |configs| configs.list(out))
    }

    /// Writes the best matches for `template` into `out`, best first, and returns how many were
    /// written. With `None`, returns the number of matches instead.
    pub fn choose_configs(&self, template: &ConfigTemplate, out: Option<&mut [ConfigHandle]>)
                          -> usize {
        self.configs.get().map_or(0, |configs| configs.choose(template, out))
    }

    /// Like `choose_configs()`, parsing an `EGL_NONE`-terminated attribute list first. Invalid
    /// lists match nothing.
    pub fn choose_configs_from_attribs(&self,
                                       attrib_list: &[EGLint],
                                       out: Option<&mut [ConfigHandle]>)
                                       -> usize {
        match ConfigTemplate::from_attrib_list(attrib_list) {
            Ok(template) => self.choose_configs(&template, out),
            Err(_) => 0,
        }
    }

    pub fn config_by_handle(&self, handle: ConfigHandle) -> Option<&Config> {
        self.configs.get()?.by_handle(handle)
    }

    pub fn config_by_id(&self, config_id: EGLint) -> Option<&Config> {
        self.configs.get()?.by_id(config_id)
    }

    // Contexts

    /// Stores a share of `context` and returns its new handle.
    pub fn add_context(&self, context: Arc<Context>) -> Result<ContextHandle, Error> {
        let mut state = self.state.lock();
        if state.lifecycle != DisplayState::Initialized {
            return Err(Error::NotInitialized);
        }
        let raw = state.contexts.insert(context).ok_or(Error::ContextCreationFailed(
            WindowingApiError::BadAlloc,
        ))?;
        trace!("{:?}: added context {:#x}", self, raw);
        Ok(ContextHandle::from_raw(raw))
    }

    pub fn get_context(&self, handle: ContextHandle) -> Option<Arc<Context>> {
        self.state.lock().contexts.get(handle.to_raw()).cloned()
    }

    /// Drops the table's share of the context. Returns false if the handle was not live.
    pub fn remove_context(&self, handle: ContextHandle) -> bool {
        let removed = self.state.lock().contexts.remove(handle.to_raw());
        trace!("{:?}: removing context {:#x}: {}", self, handle.to_raw(), removed.is_some());
        removed.is_some()
    }

    pub fn remove_context_object(&self, context: &Arc<Context>) -> bool {
        let removed = {
            let mut state = self.state.lock();
            match state.contexts.find(context) {
                Some(raw) => state.contexts.remove(raw),
                None => None,
            }
        };
        removed.is_some()
    }

    pub fn context_count(&self) -> usize {
        self.state.lock().contexts.len()
    }

    // Surfaces

    /// Stores a share of `surface` and returns its new handle.
    pub fn add_surface(&self, surface: Arc<Surface>) -> Result<SurfaceHandle, Error> {
        let mut state = self.state.lock();
        if state.lifecycle != DisplayState::Initialized {
            return Err(Error::NotInitialized);
        }
        let raw = state.surfaces.insert(surface).ok_or(Error::SurfaceCreationFailed(
            WindowingApiError::BadAlloc,
        ))?;
        trace!("{:?}: added surface {:#x}", self, raw);
        Ok(SurfaceHandle::from_raw(raw))
    }

    pub fn get_surface(&self, handle: SurfaceHandle) -> Option<Arc<Surface>> {
        self.state.lock().surfaces.get(handle.to_raw()).cloned()
    }

    /// Drops the table's share of the surface. Returns false if the handle was not live.
    pub fn remove_surface(&self, handle: SurfaceHandle) -> bool {
        let removed = self.state.lock().surfaces.remove(handle.to_raw());
        trace!("{:?}: removing surface {:#x}: {}", self, handle.to_raw(), removed.is_some());
        removed.is_some()
    }

    pub fn remove_surface_object(&self, surface: &Arc<Surface>) -> bool {
        let removed = {
            let mut state = self.state.lock();
            match state.surfaces.find(surface) {
                Some(raw) => state.surfaces.remove(raw),
                None => None,
            }
        };
        removed.is_some()
    }

    pub fn surface_count(&self) -> usize {
        self.state.lock().surfaces.len()
    }

    // Images

    /// Stores a share of `image` under the next image ID.
    ///
    /// `Error::ImageIdsExhausted` means this display can never store another image; callers
    /// should treat it as fatal.
    pub fn add_image(&self, image: Arc<Image>) -> Result<ImageHandle, Error> {
        let mut state = self.state.lock();
        if state.lifecycle != DisplayState::Initialized {
            return Err(Error::NotInitialized);
        }
        let handle = match state.image_ids.allocate() {
            Some(handle) => handle,
            None => {
                error!("{:?}: image IDs exhausted", self);
                return Err(Error::ImageIdsExhausted);
            }
        };
        state.images.insert(handle, image);
        trace!("{:?}: added image {}", self, handle.to_raw());
        Ok(handle)
    }

    pub fn get_image(&self, handle: ImageHandle) -> Option<Arc<Image>> {
        self.state.lock().images.get(&handle).cloned()
    }

    /// Drops the table's share of the image and forgets the textures bound to it. Returns false
    /// if the handle was not live.
    pub fn remove_image(&self, handle: ImageHandle) -> bool {
        let removed = self.state.lock().images.remove(&handle);
        // A bind racing with this one re-checks the table after binding and undoes itself.
        if removed.is_some() {
            self.global_names.unbind_image(handle);
        }
        trace!("{:?}: removing image {}: {}", self, handle.to_raw(), removed.is_some());
        removed.is_some()
    }

    /// Makes the host texture `texture` use the storage of the live image `image`.
    pub fn bind_image_texture(&self, texture: u32, image: ImageHandle) -> Result<(), Error> {
        self.global_names.bind_image_texture(texture, image)?;
        // The image may have been removed before the binding landed.
        if !self.state.lock().images.contains_key(&image) {
            self.global_names.unbind_image(image);
            return Err(Error::NoSuchImage);
        }
        Ok(())
    }

    /// The live image backing the host texture `texture`, if any.
    pub fn image_for_texture(&self, texture: u32) -> Option<ImageHandle> {
        self.global_names.image_for_texture(texture)
    }

    pub fn remove_image_object(&self, image: &Arc<Image>) -> bool {
        let handle = self
            .state
            .lock()
            .images
            .iter()
            .find(|(_, candidate)| Arc::ptr_eq(candidate, image))
            .map(|(&handle, _)| handle);
        match handle {
            Some(handle) => self.remove_image(handle),
            None => false,
        }
    }

    pub fn image_count(&self) -> usize {
        self.state.lock().images.len()
    }

    // Name managers

    /// The name manager for `version`. Name managers lock internally and are never used while
    /// the registry lock is held.
    #[inline]
    pub fn manager(&self, version: GLESVersion) -> &ObjectNameManager {
        &self.managers[version.index()]
    }

    /// The name manager at index `index`, for callers holding a raw version index.
    pub fn manager_at(&self, index: usize) -> Result<&ObjectNameManager, Error> {
        Ok(self.manager(GLESVersion::from_index(index)?))
    }

    #[inline]
    pub fn global_name_space(&self) -> &Arc<GlobalNameSpace> {
        &self.global_names
    }

    // Global shared context

    /// The driver context every client context is created as sharing with. Created on first
    /// use and destroyed with the display.
    ///
    /// An error here means no context can be created on this display; callers should treat it
    /// as fatal.
    pub fn global_shared_context(&self) -> Result<NativeContext, Error> {
        let mut state = self.state.lock();
        if let Some(context) = state.global_shared_context {
            return Ok(context);
        }

        let config = self
            .configs
            .get()
            .and_then(ConfigTable::first)
            .and_then(Config::native_config);
        match self.driver.create_context(self.internal_display, config, None, GLESVersion::GLES2) {
            Ok(context) => {
                debug!("{:?}: created global shared context {:?}", self, context);
                state.global_shared_context = Some(context);
                Ok(context)
            }
            Err(err) => {
                error!("{:?}: couldn't create the global shared context: {}", self, err);
                Err(Error::ContextCreationFailed(err))
            }
        }
    }

    // Record construction

    /// Creates a context on `config`. With `share_with`, the new context joins that context's
    /// share group; otherwise it gets a new one. The context is not added to the table.
    pub fn create_context(&self,
                          config: ConfigHandle,
                          version: GLESVersion,
                          share_with: Option<&Context>)
                          -> Result<Arc<Context>, Error> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        let config = self.config_by_handle(config).ok_or(Error::NoSuchConfig)?;
        let renderable = config.renderable_type().intersects(RenderableType::for_version(version));
        let native_config = match config.native_config() {
            Some(native_config) if renderable => native_config,
            _ => return Err(Error::ContextCreationFailed(WindowingApiError::BadConfig)),
        };

        let (share_group, parent) = match share_with {
            Some(shared) => {
                if shared.version() != version {
                    return Err(Error::IncompatibleSharedContext);
                }
                (shared.share_group().clone(), shared.native_context())
            }
            None => (self.manager(version).create_share_group(), self.global_shared_context()?),
        };

        let raw = self
            .driver
            .create_context(self.internal_display, Some(native_config), Some(parent), version)
            .map_err(Error::ContextCreationFailed)?;
        let native = OwnedNative::new(self.driver.clone(), self.internal_display, raw);
        Ok(Arc::new(Context::new(version, config.handle(), share_group, native)))
    }

    /// Creates an off-screen surface of `size` on `config`. It is not added to the table.
    pub fn create_pbuffer_surface(&self, config: ConfigHandle, size: Size2D<i32>)
                                  -> Result<Arc<Surface>, Error> {
        if size.width < 0 || size.height < 0 {
            return Err(Error::BadAttribute);
        }
        self.create_surface(config, SurfaceKind::Pbuffer { size })
    }

    /// Creates a surface drawing into `native_window`. It is not added to the table.
    pub fn create_window_surface(&self, config: ConfigHandle, native_window: NativeWindow)
                                 -> Result<Arc<Surface>, Error> {
        self.create_surface(config, SurfaceKind::Window { native_window })
    }

    /// Creates a surface drawing into `native_pixmap`. It is not added to the table.
    pub fn create_pixmap_surface(&self, config: ConfigHandle, native_pixmap: NativePixmap)
                                 -> Result<Arc<Surface>, Error> {
        self.create_surface(config, SurfaceKind::Pixmap { native_pixmap })
    }

    fn create_surface(&self, config: ConfigHandle, kind: SurfaceKind)
                      -> Result<Arc<Surface>, Error> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        let config = self.config_by_handle(config).ok_or(Error::NoSuchConfig)?;
        if !config.surface_type().contains(kind.required_surface_type()) {
            return Err(Error::IncompatibleConfig);
        }
        let native_config = config
            .native_config()
            .ok_or(Error::SurfaceCreationFailed(WindowingApiError::BadConfig))?;

        let display = self.internal_display;
        let raw = match kind {
            SurfaceKind::Pbuffer { size } => {
                self.driver.create_pbuffer_surface(display, native_config, size)
            }
            SurfaceKind::Window { native_window } => {
                self.driver.create_window_surface(display, native_config, native_window)
            }
            SurfaceKind::Pixmap { native_pixmap } => {
                self.driver.create_pixmap_surface(display, native_config, native_pixmap)
            }
        }
        .map_err(Error::SurfaceCreationFailed)?;
        let native = OwnedNative::new(self.driver.clone(), display, raw);
        Ok(Arc::new(Surface::new(kind, config.handle(), native)))
    }

    /// Creates an image from the texture `texture` of `context`'s share group. It is not added
    /// to the table.
    pub fn create_image(&self,
                        context: &Context,
                        texture: u32,
                        size: Size2D<i32>,
                        internal_format: u32)
                        -> Result<Arc<Image>, Error> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        let global_texture = context
            .share_group()
            .global_name(crate::NamedObjectType::Texture, texture)
            .ok_or(Error::NoSuchName)?;
        let raw = self
            .driver
            .create_image(self.internal_display, context.native_context(), global_texture)
            .map_err(Error::ImageCreationFailed)?;
        let native = OwnedNative::new(self.driver.clone(), self.internal_display, raw);
        Ok(Arc::new(Image::new(native, size, internal_format, Some(global_texture))))
    }

    #[cfg(test)]
    pub(crate) fn skip_image_ids_to(&self, next: u32) {
        self.state.lock().image_ids.skip_to(next);
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        self.terminate();
        if let Some(context) = self.state.get_mut().global_shared_context.take() {
            self.driver.destroy_context(self.internal_display, context);
        }
        debug!("{:?}: destroyed", self);
    }
}
