// emugl-egl/src/platform/headless.rs
//
//! A driver that keeps everything in memory.
//!
//! No GPU or window system is touched: native handles are plain counters. The driver records
//! which objects are alive and can be told to fail, which makes it the backend of choice for
//! tests and for running the translator without a host GL.

use crate::config::{ConfigAttributes, RenderableType};
use crate::egl::{self, EGLint};
use crate::error::ToWindowingApiError;
use crate::platform::{Driver, InternalDisplay, NativeConfig, NativeConfigInfo, NativeContext};
use crate::platform::{NativeImage, NativePixmap, NativeSurface, NativeWindow};
use crate::{GLESVersion, WindowingApiError};

use euclid::default::Size2D;
use fnv::FnvHashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The kinds of objects the headless driver hands out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeadlessObject {
    Context,
    Surface,
    Image,
}

#[derive(Default)]
struct Failures {
    query_configs: Option<EGLint>,
    create_context: Option<EGLint>,
    create_surface: Option<EGLint>,
    create_image: Option<EGLint>,
}

pub struct HeadlessDriver {
    configs: Vec<NativeConfigInfo>,
    failures: Mutex<Failures>,
    live: Mutex<FnvHashMap<usize, HeadlessObject>>,
    created_contexts: AtomicUsize,
    next_handle: AtomicUsize,
}

impl Default for HeadlessDriver {
    fn default() -> HeadlessDriver {
        HeadlessDriver::new()
    }
}

impl HeadlessDriver {
    /// A driver exposing `HeadlessDriver::standard_configs()`.
    pub fn new() -> HeadlessDriver {
        HeadlessDriver::with_configs(HeadlessDriver::standard_configs())
    }

    /// A driver exposing exactly `configs`.
    pub fn with_configs(configs: Vec<ConfigAttributes>) -> HeadlessDriver {
        let configs = configs
            .into_iter()
            .enumerate()
            .map(|(index, attributes)| NativeConfigInfo {
                native: NativeConfig(0x1000 + index),
                attributes,
            })
            .collect();
        HeadlessDriver {
            configs,
            failures: Mutex::new(Failures::default()),
            live: Mutex::new(FnvHashMap::default()),
            created_contexts: AtomicUsize::new(0),
            next_handle: AtomicUsize::new(1),
        }
    }

    /// The configs a typical desktop GLES implementation exposes.
    pub fn standard_configs() -> Vec<ConfigAttributes> {
        let mut multisampled = ConfigAttributes::rgba(8, 8, 8, 8).with_depth_stencil(24, 8);
        multisampled.samples = 4;
        multisampled.sample_buffers = 1;

        vec![
            ConfigAttributes::rgba(8, 8, 8, 8).with_depth_stencil(24, 8),
            ConfigAttributes::rgba(8, 8, 8, 8),
            ConfigAttributes::rgba(8, 8, 8, 0).with_depth_stencil(24, 8),
            ConfigAttributes::rgba(8, 8, 8, 0),
            ConfigAttributes::rgba(5, 6, 5, 0).with_depth_stencil(16, 0),
            ConfigAttributes::rgba(5, 6, 5, 0),
            multisampled,
        ]
        .into_iter()
        .enumerate()
        .map(|(index, attributes)| attributes.with_config_id(index as EGLint + 1))
        .collect()
    }

    /// Makes `query_configs` fail with the given EGL error code, or succeed again with `None`.
    pub fn fail_config_queries(&self, error: Option<EGLint>) {
        self.failures.lock().query_configs = error;
    }

    /// Makes `create_context` fail with the given EGL error code, or succeed again with `None`.
    pub fn fail_context_creation(&self, error: Option<EGLint>) {
        self.failures.lock().create_context = error;
    }

    pub fn fail_surface_creation(&self, error: Option<EGLint>) {
        self.failures.lock().create_surface = error;
    }

    pub fn fail_image_creation(&self, error: Option<EGLint>) {
        self.failures.lock().create_image = error;
    }

    /// The number of objects of `kind` created and not yet destroyed.
    pub fn live_count(&self, kind: HeadlessObject) -> usize {
        self.live.lock().values().filter(|&&live_kind| live_kind == kind).count()
    }

    /// Returns true if the surface has been created and not yet destroyed.
    pub fn is_live_surface(&self, surface: NativeSurface) -> bool {
        self.live.lock().get(&surface.0) == Some(&HeadlessObject::Surface)
    }

    /// The number of contexts ever created.
    pub fn created_context_count(&self) -> usize {
        self.created_contexts.load(Ordering::SeqCst)
    }

    fn create(&self, kind: HeadlessObject, failure: Option<EGLint>)
              -> Result<usize, WindowingApiError> {
        if let Some(error) = failure {
            return Err(error.to_windowing_api_error());
        }
        let raw = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.live.lock().insert(raw, kind);
        Ok(raw)
    }

    fn destroy(&self, kind: HeadlessObject, raw: usize) {
        let mut live = self.live.lock();
        if live.get(&raw) == Some(&kind) {
            live.remove(&raw);
        } else {
            warn!("destroying unknown headless {:?} {:#x}", kind, raw);
        }
    }

    fn has_config(&self, config: NativeConfig) -> bool {
        self.configs.iter().any(|info| info.native == config)
    }
}

impl Driver for HeadlessDriver {
    fn query_configs(&self, _: InternalDisplay, renderable_type: RenderableType)
                     -> Result<Vec<NativeConfigInfo>, WindowingApiError> {
        if let Some(error) = self.failures.lock().query_configs {
            return Err(error.to_windowing_api_error());
        }
        Ok(self
            .configs
            .iter()
            .filter(|info| info.attributes.renderable_type.intersects(renderable_type))
            .cloned()
            .collect())
    }

    fn create_context(&self,
                      _: InternalDisplay,
                      config: Option<NativeConfig>,
                      _: Option<NativeContext>,
                      _: GLESVersion)
                      -> Result<NativeContext, WindowingApiError> {
        if let Some(config) = config {
            if !self.has_config(config) {
                return Err(WindowingApiError::BadConfig);
            }
        }
        let failure = self.failures.lock().create_context;
        let raw = self.create(HeadlessObject::Context, failure)?;
        self.created_contexts.fetch_add(1, Ordering::SeqCst);
        Ok(NativeContext(raw))
    }

    fn destroy_context(&self, _: InternalDisplay, context: NativeContext) {
        self.destroy(HeadlessObject::Context, context.0)
    }

    fn create_pbuffer_surface(&self, _: InternalDisplay, config: NativeConfig, size: Size2D<i32>)
                              -> Result<NativeSurface, WindowingApiError> {
        if !self.has_config(config) {
            return Err(WindowingApiError::BadConfig);
        }
        if size.width < 0 || size.height < 0 {
            return Err(egl::BAD_PARAMETER.to_windowing_api_error());
        }
        let failure = self.failures.lock().create_surface;
        Ok(NativeSurface(self.create(HeadlessObject::Surface, failure)?))
    }

    fn create_window_surface(&self, _: InternalDisplay, config: NativeConfig, window: NativeWindow)
                             -> Result<NativeSurface, WindowingApiError> {
        if !self.has_config(config) {
            return Err(WindowingApiError::BadConfig);
        }
        if window.0 == 0 {
            return Err(WindowingApiError::BadNativeWindow);
        }
        let failure = self.failures.lock().create_surface;
        Ok(NativeSurface(self.create(HeadlessObject::Surface, failure)?))
    }

    fn create_pixmap_surface(&self, _: InternalDisplay, config: NativeConfig, pixmap: NativePixmap)
                             -> Result<NativeSurface, WindowingApiError> {
        if !self.has_config(config) {
            return Err(WindowingApiError::BadConfig);
        }
        if pixmap.0 == 0 {
            return Err(WindowingApiError::BadNativePixmap);
        }
        let failure = self.failures.lock().create_surface;
        Ok(NativeSurface(self.create(HeadlessObject::Surface, failure)?))
    }

    fn destroy_surface(&self, _: InternalDisplay, surface: NativeSurface) {
        self.destroy(HeadlessObject::Surface, surface.0)
    }

    fn create_image(&self, _: InternalDisplay, context: NativeContext, _: u32)
                    -> Result<NativeImage, WindowingApiError> {
        if self.live.lock().get(&context.0) != Some(&HeadlessObject::Context) {
            return Err(WindowingApiError::BadContext);
        }
        let failure = self.failures.lock().create_image;
        Ok(NativeImage(self.create(HeadlessObject::Image, failure)?))
    }

    fn destroy_image(&self, _: InternalDisplay, image: NativeImage) {
        self.destroy(HeadlessObject::Image, image.0)
    }
}
