// emugl-egl/src/connection.rs
//
//! The display factory.

use crate::display::Display;
use crate::platform::{Driver, InternalDisplay, NativeDisplay};

use fnv::FnvHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Displays {
    by_native: FnvHashMap<NativeDisplay, Arc<Display>>,
    default: Option<NativeDisplay>,
}

/// Owns the displays opened on one driver, keyed by native display handle.
pub struct Connection {
    driver: Arc<dyn Driver>,
    displays: Mutex<Displays>,
}

impl Connection {
    pub fn new(driver: Arc<dyn Driver>) -> Connection {
        Connection { driver, displays: Mutex::new(Displays::default()) }
    }

    #[inline]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Returns the display for `native`, creating it if needed. The first display created while
    /// there is no default display becomes the default.
    pub fn add_display(&self, native: NativeDisplay, internal: InternalDisplay) -> Arc<Display> {
        let mut displays = self.displays.lock();
        if let Some(display) = displays.by_native.get(&native) {
            return display.clone();
        }

        let is_default = displays.default.is_none();
        let display = Arc::new(Display::new(self.driver.clone(), native, internal, is_default));
        if is_default {
            displays.default = Some(native);
        }
        displays.by_native.insert(native, display.clone());
        debug!("added {:?} (default: {})", display, is_default);
        display
    }

    pub fn display(&self, native: NativeDisplay) -> Option<Arc<Display>> {
        self.displays.lock().by_native.get(&native).cloned()
    }

    pub fn default_display(&self) -> Option<Arc<Display>> {
        let displays = self.displays.lock();
        displays.default.and_then(|native| displays.by_native.get(&native).cloned())
    }

    /// Forgets the display for `native`. It is destroyed once its last share is dropped.
    pub fn remove_display(&self, native: NativeDisplay) -> bool {
        let removed = {
            let mut displays = self.displays.lock();
            let removed = displays.by_native.remove(&native);
            if removed.is_some() && displays.default == Some(native) {
                displays.default = None;
            }
            removed
        };
        removed.is_some()
    }

    pub fn display_count(&self) -> usize {
        self.displays.lock().by_native.len()
    }
}
