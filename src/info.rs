// emugl-egl/src/info.rs
//
//! OpenGL ES information.

use crate::Error;

/// The number of GLES versions that have their own name manager.
pub const MAX_GLES_VERSION: usize = 2;

/// The GLES API family a context speaks.
///
/// GLES 2 and GLES 3 contexts share one name space, since GLES 3 is a superset of GLES 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GLESVersion {
    /// OpenGL ES 1.x (fixed function).
    GLES1,
    /// OpenGL ES 2.0 and 3.x.
    GLES2,
}

impl GLESVersion {
    /// All supported versions, in name-manager index order.
    pub const ALL: [GLESVersion; MAX_GLES_VERSION] = [GLESVersion::GLES1, GLESVersion::GLES2];

    /// The index of this version's name manager.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            GLESVersion::GLES1 => 0,
            GLESVersion::GLES2 => 1,
        }
    }

    /// Returns the version with the given name-manager index.
    pub fn from_index(index: usize) -> Result<GLESVersion, Error> {
        GLESVersion::ALL.get(index).copied().ok_or(Error::UnsupportedGLESVersion)
    }

    /// Maps an `EGL_CONTEXT_CLIENT_VERSION` value to its version family.
    pub fn from_client_version(major: u32) -> Result<GLESVersion, Error> {
        match major {
            1 => Ok(GLESVersion::GLES1),
            2 | 3 => Ok(GLESVersion::GLES2),
            _ => Err(Error::UnsupportedGLESVersion),
        }
    }
}

impl TryFrom<u32> for GLESVersion {
    type Error = Error;

    #[inline]
    fn try_from(major: u32) -> Result<GLESVersion, Error> {
        GLESVersion::from_client_version(major)
    }
}
