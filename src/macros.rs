// emugl-egl/src/macros.rs
//
//! Macros.

/// Declares an opaque handle type wrapping an unsigned integer.
///
/// The raw value `0` is reserved as the null handle and never names an object.
macro_rules! declare_handle {
    ($(#[$attr:meta])* $name:ident($repr:ty)) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name($repr);

        impl $name {
            /// The null handle.
            pub const NONE: $name = $name(0);

            /// Wraps a raw value received from a client.
            #[inline]
            pub fn from_raw(raw: $repr) -> $name {
                $name(raw)
            }

            /// Returns the raw value handed out to clients.
            #[inline]
            pub fn to_raw(self) -> $repr {
                self.0
            }

            /// Returns true if this is the null handle.
            #[inline]
            pub fn is_none(self) -> bool {
                self.0 == 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.0)
            }
        }
    };
}
