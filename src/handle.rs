// emugl-egl/src/handle.rs
//
//! Opaque handles handed out by a display, and the allocators that mint them.

declare_handle!(
    /// Names a framebuffer configuration of a display.
    ConfigHandle(u32)
);

declare_handle!(
    /// Names a context in a display's context table.
    ContextHandle(u64)
);

declare_handle!(
    /// Names a surface in a display's surface table.
    SurfaceHandle(u64)
);

declare_handle!(
    /// Names an image in a display's image table.
    ///
    /// Image handles are issued from a monotonic counter and are never reused within the
    /// lifetime of a display.
    ImageHandle(u32)
);

impl ConfigHandle {
    #[inline]
    pub(crate) fn from_index(index: usize) -> ConfigHandle {
        ConfigHandle(index as u32 + 1)
    }

    #[inline]
    pub(crate) fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

/// A slot position plus the generation the slot had when the handle was issued.
///
/// Packed as `(generation << 32) | (index + 1)`, so the packed value is never zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SlotKey {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl SlotKey {
    #[inline]
    pub(crate) fn pack(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64 + 1)
    }

    #[inline]
    pub(crate) fn unpack(raw: u64) -> Option<SlotKey> {
        let low = raw as u32;
        if low == 0 {
            return None;
        }
        Some(SlotKey { index: low - 1, generation: (raw >> 32) as u32 })
    }
}

/// Issues image handles 1, 2, 3, ... and reports exhaustion once `u32::MAX` has been issued.
pub(crate) struct ImageIdAllocator {
    // Zero once the id space is used up.
    next: u32,
}

impl ImageIdAllocator {
    pub(crate) fn new() -> ImageIdAllocator {
        ImageIdAllocator { next: 1 }
    }

    pub(crate) fn allocate(&mut self) -> Option<ImageHandle> {
        if self.next == 0 {
            return None;
        }
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        Some(ImageHandle(id))
    }

    #[cfg(test)]
    pub(crate) fn skip_to(&mut self, next: u32) {
        self.next = next;
    }
}
