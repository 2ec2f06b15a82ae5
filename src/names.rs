// emugl-egl/src/names.rs
//
//! Translation of guest-visible GL object names to host names.
//!
//! Each GLES version has an `ObjectNameManager` that owns the share groups of that version's
//! contexts. A share group maps the names its contexts see to names in the `GlobalNameSpace`,
//! which is shared by all versions of a display so that textures can cross between them through
//! EGL images.

use crate::handle::ImageHandle;
use crate::{Error, GLESVersion};

use fnv::{FnvHashMap, FnvHashSet};
use parking_lot::Mutex;
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// The GL object name spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamedObjectType {
    Buffer,
    Texture,
    Renderbuffer,
    Framebuffer,
    /// Shaders and programs share one name space.
    ShaderOrProgram,
    Sampler,
    Query,
    VertexArray,
    TransformFeedback,
}

const NAMED_OBJECT_TYPE_COUNT: usize = 9;

impl NamedObjectType {
    pub const ALL: [NamedObjectType; NAMED_OBJECT_TYPE_COUNT] = [
        NamedObjectType::Buffer,
        NamedObjectType::Texture,
        NamedObjectType::Renderbuffer,
        NamedObjectType::Framebuffer,
        NamedObjectType::ShaderOrProgram,
        NamedObjectType::Sampler,
        NamedObjectType::Query,
        NamedObjectType::VertexArray,
        NamedObjectType::TransformFeedback,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// The identifier `glObjectLabel()` uses for objects of this type.
    pub fn gl_identifier(self) -> u32 {
        match self {
            NamedObjectType::Buffer => glow::BUFFER,
            NamedObjectType::Texture => glow::TEXTURE,
            NamedObjectType::Renderbuffer => glow::RENDERBUFFER,
            NamedObjectType::Framebuffer => glow::FRAMEBUFFER,
            NamedObjectType::ShaderOrProgram => glow::PROGRAM,
            NamedObjectType::Sampler => glow::SAMPLER,
            NamedObjectType::Query => glow::QUERY,
            NamedObjectType::VertexArray => glow::VERTEX_ARRAY,
            NamedObjectType::TransformFeedback => glow::TRANSFORM_FEEDBACK,
        }
    }
}

#[derive(Default)]
struct GlobalNames {
    next: [u32; NAMED_OBJECT_TYPE_COUNT],
    live: FnvHashSet<(NamedObjectType, u32)>,
    // Host texture name -> the EGL image whose storage it uses.
    image_textures: FnvHashMap<u32, ImageHandle>,
}

/// Host-side names, shared by every name manager of a display.
#[derive(Default)]
pub struct GlobalNameSpace {
    names: Mutex<GlobalNames>,
}

impl GlobalNameSpace {
    pub fn new() -> GlobalNameSpace {
        GlobalNameSpace::default()
    }

    /// Mints a host name. Host names start at 1 and are not reused, so `Error::NamesExhausted`
    /// is permanent for `kind`.
    pub fn gen_name(&self, kind: NamedObjectType) -> Result<u32, Error> {
        let mut names = self.names.lock();
        let next = &mut names.next[kind.index()];
        let name = match next.checked_add(1) {
            Some(name) => name,
            None => {
                error!("host {:?} names exhausted", kind);
                return Err(Error::NamesExhausted);
            }
        };
        *next = name;
        names.live.insert((kind, name));
        Ok(name)
    }

    /// Releases a host name. Returns false if it wasn't live.
    pub fn delete_name(&self, kind: NamedObjectType, name: u32) -> bool {
        let mut names = self.names.lock();
        if !names.live.remove(&(kind, name)) {
            return false;
        }
        if kind == NamedObjectType::Texture {
            names.image_textures.remove(&name);
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn skip_names_to(&self, kind: NamedObjectType, last: u32) {
        self.names.lock().next[kind.index()] = last;
    }

    pub fn is_live(&self, kind: NamedObjectType, name: u32) -> bool {
        self.names.lock().live.contains(&(kind, name))
    }

    // Records that the host texture `texture` now uses the storage of `image`. The display
    // checks that the image is still live afterwards.
    pub(crate) fn bind_image_texture(&self, texture: u32, image: ImageHandle)
                                     -> Result<(), Error> {
        let mut names = self.names.lock();
        if !names.live.contains(&(NamedObjectType::Texture, texture)) {
            return Err(Error::NoSuchName);
        }
        names.image_textures.insert(texture, image);
        Ok(())
    }

    /// The image backing the host texture `texture`, if any.
    pub fn image_for_texture(&self, texture: u32) -> Option<ImageHandle> {
        self.names.lock().image_textures.get(&texture).copied()
    }

    // Forgets every texture binding of `image`. Returns the number of textures unbound.
    pub(crate) fn unbind_image(&self, image: ImageHandle) -> usize {
        let mut names = self.names.lock();
        let before = names.image_textures.len();
        names.image_textures.retain(|_, &mut bound| bound != image);
        before - names.image_textures.len()
    }
}

/// Identifies a share group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShareGroupID(pub u64);

static NEXT_SHARE_GROUP_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct NameMap {
    local_to_global: FnvHashMap<u32, u32>,
    next_local: u32,
}

/// The names shared by a set of contexts.
///
/// A share group is kept alive by its contexts. When the last one goes away, the host names it
/// still maps are released.
pub struct ShareGroup {
    id: ShareGroupID,
    version: GLESVersion,
    global: Arc<GlobalNameSpace>,
    maps: Mutex<[NameMap; NAMED_OBJECT_TYPE_COUNT]>,
}

impl ShareGroup {
    fn new(version: GLESVersion, global: Arc<GlobalNameSpace>) -> ShareGroup {
        ShareGroup {
            id: ShareGroupID(NEXT_SHARE_GROUP_ID.fetch_add(1, Ordering::Relaxed)),
            version,
            global,
            maps: Mutex::new(Default::default()),
        }
    }

    #[inline]
    pub fn id(&self) -> ShareGroupID {
        self.id
    }

    #[inline]
    pub fn version(&self) -> GLESVersion {
        self.version
    }

    /// Allocates an unused local name, backed by a fresh host name.
    pub fn gen_name(&self, kind: NamedObjectType) -> Result<u32, Error> {
        let mut maps = self.maps.lock();
        let map = &mut maps[kind.index()];
        let mut local = map.next_local;
        loop {
            local = match local.checked_add(1) {
                Some(local) => local,
                None => {
                    warn!("{:?}: local {:?} names exhausted", self, kind);
                    return Err(Error::NamesExhausted);
                }
            };
            if !map.local_to_global.contains_key(&local) {
                break;
            }
        }
        let global = self.global.gen_name(kind)?;
        map.next_local = local;
        map.local_to_global.insert(local, global);
        Ok(local)
    }

    /// Binds a client-chosen local name, as `glBindTexture()` does for names it has never seen.
    /// Returns the host name.
    pub fn gen_name_with(&self, kind: NamedObjectType, local: u32) -> Result<u32, Error> {
        if local == 0 {
            return Err(Error::NoSuchName);
        }
        let mut maps = self.maps.lock();
        let map = &mut maps[kind.index()];
        if let Some(&global) = map.local_to_global.get(&local) {
            return Ok(global);
        }
        let global = self.global.gen_name(kind)?;
        map.local_to_global.insert(local, global);
        Ok(global)
    }

    #[cfg(test)]
    pub(crate) fn skip_local_names_to(&self, kind: NamedObjectType, last: u32) {
        self.maps.lock()[kind.index()].next_local = last;
    }

    pub fn global_name(&self, kind: NamedObjectType, local: u32) -> Option<u32> {
        self.maps.lock()[kind.index()].local_to_global.get(&local).copied()
    }

    pub fn local_name(&self, kind: NamedObjectType, global: u32) -> Option<u32> {
        self.maps.lock()[kind.index()]
            .local_to_global
            .iter()
            .find(|&(_, &candidate)| candidate == global)
            .map(|(&local, _)| local)
    }

    #[inline]
    pub fn is_object(&self, kind: NamedObjectType, local: u32) -> bool {
        self.global_name(kind, local).is_some()
    }

    /// Deletes a local name and releases its host name.
    pub fn delete_name(&self, kind: NamedObjectType, local: u32) -> bool {
        let global = self.maps.lock()[kind.index()].local_to_global.remove(&local);
        match global {
            Some(global) => {
                self.global.delete_name(kind, global);
                true
            }
            None => false,
        }
    }
}

impl Debug for ShareGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ShareGroup({}, {:?})", self.id.0, self.version)
    }
}

impl Drop for ShareGroup {
    fn drop(&mut self) {
        for kind in NamedObjectType::ALL {
            let map = &mut self.maps.get_mut()[kind.index()];
            for (_, global) in map.local_to_global.drain() {
                self.global.delete_name(kind, global);
            }
        }
    }
}

/// The share groups of one GLES version.
///
/// Managers have their own lock and are never used while the registry lock is held.
pub struct ObjectNameManager {
    version: GLESVersion,
    global: Arc<GlobalNameSpace>,
    groups: Mutex<FnvHashMap<ShareGroupID, Weak<ShareGroup>>>,
}

impl ObjectNameManager {
    pub fn new(version: GLESVersion, global: Arc<GlobalNameSpace>) -> ObjectNameManager {
        ObjectNameManager { version, global, groups: Mutex::new(FnvHashMap::default()) }
    }

    #[inline]
    pub fn version(&self) -> GLESVersion {
        self.version
    }

    #[inline]
    pub fn global_name_space(&self) -> &Arc<GlobalNameSpace> {
        &self.global
    }

    pub fn create_share_group(&self) -> Arc<ShareGroup> {
        let group = Arc::new(ShareGroup::new(self.version, self.global.clone()));
        let mut groups = self.groups.lock();
        groups.retain(|_, group| group.strong_count() > 0);
        groups.insert(group.id, Arc::downgrade(&group));
        trace!("created share group {:?} for {:?}", group.id, self.version);
        group
    }

    /// Returns the share group `id` if it is still alive, for a context joining it.
    pub fn attach_share_group(&self, id: ShareGroupID) -> Option<Arc<ShareGroup>> {
        self.groups.lock().get(&id).and_then(Weak::upgrade)
    }

    #[inline]
    pub fn share_group(&self, id: ShareGroupID) -> Option<Arc<ShareGroup>> {
        self.attach_share_group(id)
    }

    /// Stops tracking a share group. Contexts still holding it keep it alive.
    pub fn delete_share_group(&self, id: ShareGroupID) -> bool {
        self.groups.lock().remove(&id).is_some()
    }

    /// The number of live share groups.
    pub fn share_group_count(&self) -> usize {
        self.groups.lock().values().filter(|group| group.strong_count() > 0).count()
    }
}
