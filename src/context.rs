// emugl-egl/src/context.rs
//
//! Rendering context records.

use crate::handle::ConfigHandle;
use crate::names::ShareGroup;
use crate::platform::{NativeContext, OwnedNative};
use crate::GLESVersion;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A process-wide unique context ID, stable for the life of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextID(pub u64);

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A GLES rendering context.
///
/// Contexts are shared: the display's context table holds one `Arc`, and so may any thread the
/// context is current on. The native context is destroyed when the last share is dropped.
#[derive(Debug)]
pub struct Context {
    id: ContextID,
    version: GLESVersion,
    config: ConfigHandle,
    share_group: Arc<ShareGroup>,
    native: OwnedNative<NativeContext>,
}

impl Context {
    pub fn new(version: GLESVersion,
               config: ConfigHandle,
               share_group: Arc<ShareGroup>,
               native: OwnedNative<NativeContext>)
               -> Context {
        Context {
            id: ContextID(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)),
            version,
            config,
            share_group,
            native,
        }
    }

    #[inline]
    pub fn id(&self) -> ContextID {
        self.id
    }

    #[inline]
    pub fn version(&self) -> GLESVersion {
        self.version
    }

    #[inline]
    pub fn config(&self) -> ConfigHandle {
        self.config
    }

    #[inline]
    pub fn share_group(&self) -> &Arc<ShareGroup> {
        &self.share_group
    }

    #[inline]
    pub fn native_context(&self) -> NativeContext {
        self.native.raw()
    }
}
