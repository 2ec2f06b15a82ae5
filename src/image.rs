// emugl-egl/src/image.rs
//
//! Cross-context image records.

use crate::platform::{NativeImage, OwnedNative};

use euclid::default::Size2D;

/// An `EGLImageKHR`: texture storage that any context of the display can bind.
#[derive(Debug)]
pub struct Image {
    native: OwnedNative<NativeImage>,
    size: Size2D<i32>,
    internal_format: u32,
    global_texture: Option<u32>,
}

impl Image {
    /// `global_texture` is the host texture the image was created from, if any.
    pub fn new(native: OwnedNative<NativeImage>,
               size: Size2D<i32>,
               internal_format: u32,
               global_texture: Option<u32>)
               -> Image {
        Image { native, size, internal_format, global_texture }
    }

    #[inline]
    pub fn native_image(&self) -> NativeImage {
        self.native.raw()
    }

    #[inline]
    pub fn size(&self) -> Size2D<i32> {
        self.size
    }

    #[inline]
    pub fn internal_format(&self) -> u32 {
        self.internal_format
    }

    #[inline]
    pub fn global_texture(&self) -> Option<u32> {
        self.global_texture
    }
}
