// emugl-egl/src/config.rs
//
//! Framebuffer configurations and the frozen table that holds them.

use crate::egl::{self, EGLint};
use crate::handle::ConfigHandle;
use crate::platform::{NativeConfig, NativeConfigInfo};
use crate::{Error, GLESVersion};

use fnv::FnvHashMap;
use std::cmp::Ordering;

bitflags! {
    /// Client APIs a config can render with, as in `EGL_RENDERABLE_TYPE` and `EGL_CONFORMANT`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderableType: EGLint {
        const OPENGL_ES  = egl::OPENGL_ES_BIT;
        const OPENVG     = egl::OPENVG_BIT;
        const OPENGL_ES2 = egl::OPENGL_ES2_BIT;
        const OPENGL     = egl::OPENGL_BIT;
        const OPENGL_ES3 = egl::OPENGL_ES3_BIT_KHR;
    }
}

bitflags! {
    /// Kinds of surfaces a config can back, as in `EGL_SURFACE_TYPE`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SurfaceTypeMask: EGLint {
        const PBUFFER = egl::PBUFFER_BIT;
        const PIXMAP  = egl::PIXMAP_BIT;
        const WINDOW  = egl::WINDOW_BIT;
    }
}

impl RenderableType {
    /// The renderable bits a context of the given version needs.
    pub fn for_version(version: GLESVersion) -> RenderableType {
        match version {
            GLESVersion::GLES1 => RenderableType::OPENGL_ES,
            GLESVersion::GLES2 => RenderableType::OPENGL_ES2 | RenderableType::OPENGL_ES3,
        }
    }
}

/// `EGL_CONFIG_CAVEAT`, declared in order of preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigCaveat {
    None,
    Slow,
    NonConformant,
}

impl ConfigCaveat {
    pub fn to_egl(self) -> EGLint {
        match self {
            ConfigCaveat::None => egl::NONE,
            ConfigCaveat::Slow => egl::SLOW_CONFIG,
            ConfigCaveat::NonConformant => egl::NON_CONFORMANT_CONFIG,
        }
    }

    pub fn from_egl(value: EGLint) -> Option<ConfigCaveat> {
        match value {
            egl::NONE => Some(ConfigCaveat::None),
            egl::SLOW_CONFIG => Some(ConfigCaveat::Slow),
            egl::NON_CONFORMANT_CONFIG => Some(ConfigCaveat::NonConformant),
            _ => None,
        }
    }
}

/// `EGL_COLOR_BUFFER_TYPE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorBufferType {
    Rgb,
    Luminance,
}

impl ColorBufferType {
    pub fn to_egl(self) -> EGLint {
        match self {
            ColorBufferType::Rgb => egl::RGB_BUFFER,
            ColorBufferType::Luminance => egl::LUMINANCE_BUFFER,
        }
    }
}

/// The attributes of a framebuffer configuration, as reported by the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigAttributes {
    pub config_id: EGLint,
    pub red_size: EGLint,
    pub green_size: EGLint,
    pub blue_size: EGLint,
    pub alpha_size: EGLint,
    pub luminance_size: EGLint,
    pub alpha_mask_size: EGLint,
    pub buffer_size: EGLint,
    pub depth_size: EGLint,
    pub stencil_size: EGLint,
    pub samples: EGLint,
    pub sample_buffers: EGLint,
    pub caveat: ConfigCaveat,
    pub color_buffer_type: ColorBufferType,
    pub conformant: RenderableType,
    pub renderable_type: RenderableType,
    pub surface_type: SurfaceTypeMask,
    pub level: EGLint,
    pub native_renderable: bool,
    pub native_visual_id: EGLint,
    pub native_visual_type: EGLint,
    /// `EGL_NONE` or `EGL_TRANSPARENT_RGB`.
    pub transparent_type: EGLint,
    pub transparent_red: EGLint,
    pub transparent_green: EGLint,
    pub transparent_blue: EGLint,
    pub min_swap_interval: EGLint,
    pub max_swap_interval: EGLint,
    pub bind_to_texture_rgb: bool,
    pub bind_to_texture_rgba: bool,
    pub max_pbuffer_width: EGLint,
    pub max_pbuffer_height: EGLint,
    pub max_pbuffer_pixels: EGLint,
}

const MAX_PBUFFER_SIZE: EGLint = 4096;

impl ConfigAttributes {
    /// An RGB(A) config with no depth or stencil buffer, renderable by every GLES version and
    /// usable for every kind of surface.
    pub fn rgba(red: EGLint, green: EGLint, blue: EGLint, alpha: EGLint) -> ConfigAttributes {
        let gles = RenderableType::OPENGL_ES | RenderableType::OPENGL_ES2 |
            RenderableType::OPENGL_ES3;
        ConfigAttributes {
            config_id: 0,
            red_size: red,
            green_size: green,
            blue_size: blue,
            alpha_size: alpha,
            luminance_size: 0,
            alpha_mask_size: 0,
            buffer_size: red + green + blue + alpha,
            depth_size: 0,
            stencil_size: 0,
            samples: 0,
            sample_buffers: 0,
            caveat: ConfigCaveat::None,
            color_buffer_type: ColorBufferType::Rgb,
            conformant: gles,
            renderable_type: gles,
            surface_type: SurfaceTypeMask::all(),
            level: 0,
            native_renderable: false,
            native_visual_id: 0,
            native_visual_type: egl::NONE,
            transparent_type: egl::NONE,
            transparent_red: 0,
            transparent_green: 0,
            transparent_blue: 0,
            min_swap_interval: 1,
            max_swap_interval: 1,
            bind_to_texture_rgb: false,
            bind_to_texture_rgba: false,
            max_pbuffer_width: MAX_PBUFFER_SIZE,
            max_pbuffer_height: MAX_PBUFFER_SIZE,
            max_pbuffer_pixels: MAX_PBUFFER_SIZE * MAX_PBUFFER_SIZE,
        }
    }

    /// Returns a copy with the given depth and stencil sizes.
    pub fn with_depth_stencil(mut self, depth: EGLint, stencil: EGLint) -> ConfigAttributes {
        self.depth_size = depth;
        self.stencil_size = stencil;
        self
    }

    /// Returns a copy with the given config ID.
    pub fn with_config_id(mut self, config_id: EGLint) -> ConfigAttributes {
        self.config_id = config_id;
        self
    }

    /// The value of an EGL config attribute, or `None` for attributes that are not config
    /// attributes.
    pub fn get(&self, attribute: EGLint) -> Option<EGLint> {
        let value = match attribute {
            egl::BUFFER_SIZE => self.buffer_size,
            egl::RED_SIZE => self.red_size,
            egl::GREEN_SIZE => self.green_size,
            egl::BLUE_SIZE => self.blue_size,
            egl::ALPHA_SIZE => self.alpha_size,
            egl::LUMINANCE_SIZE => self.luminance_size,
            egl::ALPHA_MASK_SIZE => self.alpha_mask_size,
            egl::DEPTH_SIZE => self.depth_size,
            egl::STENCIL_SIZE => self.stencil_size,
            egl::SAMPLES => self.samples,
            egl::SAMPLE_BUFFERS => self.sample_buffers,
            egl::CONFIG_CAVEAT => self.caveat.to_egl(),
            egl::CONFIG_ID => self.config_id,
            egl::COLOR_BUFFER_TYPE => self.color_buffer_type.to_egl(),
            egl::CONFORMANT => self.conformant.bits(),
            egl::RENDERABLE_TYPE => self.renderable_type.bits(),
            egl::SURFACE_TYPE => self.surface_type.bits(),
            egl::LEVEL => self.level,
            egl::NATIVE_RENDERABLE => self.native_renderable as EGLint,
            egl::NATIVE_VISUAL_ID => self.native_visual_id,
            egl::NATIVE_VISUAL_TYPE => self.native_visual_type,
            egl::TRANSPARENT_TYPE => self.transparent_type,
            egl::TRANSPARENT_RED_VALUE => self.transparent_red,
            egl::TRANSPARENT_GREEN_VALUE => self.transparent_green,
            egl::TRANSPARENT_BLUE_VALUE => self.transparent_blue,
            egl::MIN_SWAP_INTERVAL => self.min_swap_interval,
            egl::MAX_SWAP_INTERVAL => self.max_swap_interval,
            egl::BIND_TO_TEXTURE_RGB => self.bind_to_texture_rgb as EGLint,
            egl::BIND_TO_TEXTURE_RGBA => self.bind_to_texture_rgba as EGLint,
            egl::MAX_PBUFFER_WIDTH => self.max_pbuffer_width,
            egl::MAX_PBUFFER_HEIGHT => self.max_pbuffer_height,
            egl::MAX_PBUFFER_PIXELS => self.max_pbuffer_pixels,
            _ => return None,
        };
        Some(value)
    }

    fn has_format(&self, format: &WellKnownFormat) -> bool {
        self.red_size == format.red &&
            self.green_size == format.green &&
            self.blue_size == format.blue &&
            self.alpha_size == format.alpha &&
            self.depth_size == format.depth &&
            self.stencil_size == format.stencil
    }
}

/// A framebuffer configuration of a display.
#[derive(Clone, Debug)]
pub struct Config {
    handle: ConfigHandle,
    native: Option<NativeConfig>,
    attributes: ConfigAttributes,
}

impl Config {
    #[inline]
    pub fn handle(&self) -> ConfigHandle {
        self.handle
    }

    #[inline]
    pub fn config_id(&self) -> EGLint {
        self.attributes.config_id
    }

    /// The driver's handle for this config, or `None` if the config was synthesized because the
    /// driver didn't expose it.
    #[inline]
    pub fn native_config(&self) -> Option<NativeConfig> {
        self.native
    }

    #[inline]
    pub fn attributes(&self) -> &ConfigAttributes {
        &self.attributes
    }

    /// Returns true for the non-renderable placeholders added for well-known formats the driver
    /// lacks.
    #[inline]
    pub fn is_synthesized(&self) -> bool {
        self.native.is_none()
    }

    #[inline]
    pub fn renderable_type(&self) -> RenderableType {
        self.attributes.renderable_type
    }

    #[inline]
    pub fn surface_type(&self) -> SurfaceTypeMask {
        self.attributes.surface_type
    }

    /// Answers `eglGetConfigAttrib()`.
    #[inline]
    pub fn get_attrib(&self, attribute: EGLint) -> Option<EGLint> {
        self.attributes.get(attribute)
    }
}

// How a template value constrains the matching config attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
enum MatchRule {
    AtLeast,
    Exact,
    Mask,
    Ignore,
}

fn match_rule(attribute: EGLint) -> Option<MatchRule> {
    match attribute {
        egl::BUFFER_SIZE | egl::RED_SIZE | egl::GREEN_SIZE | egl::BLUE_SIZE | egl::ALPHA_SIZE |
        egl::LUMINANCE_SIZE | egl::ALPHA_MASK_SIZE | egl::DEPTH_SIZE | egl::STENCIL_SIZE |
        egl::SAMPLES | egl::SAMPLE_BUFFERS => Some(MatchRule::AtLeast),
        egl::CONFIG_CAVEAT | egl::CONFIG_ID | egl::COLOR_BUFFER_TYPE | egl::LEVEL |
        egl::NATIVE_RENDERABLE | egl::NATIVE_VISUAL_TYPE | egl::TRANSPARENT_TYPE |
        egl::TRANSPARENT_RED_VALUE | egl::TRANSPARENT_GREEN_VALUE |
        egl::TRANSPARENT_BLUE_VALUE | egl::MIN_SWAP_INTERVAL | egl::MAX_SWAP_INTERVAL |
        egl::BIND_TO_TEXTURE_RGB | egl::BIND_TO_TEXTURE_RGBA => Some(MatchRule::Exact),
        egl::CONFORMANT | egl::RENDERABLE_TYPE | egl::SURFACE_TYPE => Some(MatchRule::Mask),
        egl::MATCH_NATIVE_PIXMAP | egl::NATIVE_VISUAL_ID | egl::MAX_PBUFFER_WIDTH |
        egl::MAX_PBUFFER_HEIGHT | egl::MAX_PBUFFER_PIXELS => Some(MatchRule::Ignore),
        _ => None,
    }
}

/// The selection criteria of an `eglChooseConfig()` call.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigTemplate {
    values: FnvHashMap<EGLint, EGLint>,
}

impl Default for ConfigTemplate {
    fn default() -> ConfigTemplate {
        ConfigTemplate::new()
    }
}

impl ConfigTemplate {
    /// The template an empty attribute list describes.
    pub fn new() -> ConfigTemplate {
        let defaults = [
            (egl::COLOR_BUFFER_TYPE, egl::RGB_BUFFER),
            (egl::CONFIG_CAVEAT, egl::DONT_CARE),
            (egl::CONFIG_ID, egl::DONT_CARE),
            (egl::LEVEL, 0),
            (egl::NATIVE_RENDERABLE, egl::DONT_CARE),
            (egl::NATIVE_VISUAL_TYPE, egl::DONT_CARE),
            (egl::RENDERABLE_TYPE, egl::OPENGL_ES_BIT),
            (egl::SURFACE_TYPE, egl::WINDOW_BIT),
            (egl::TRANSPARENT_TYPE, egl::NONE),
        ];
        ConfigTemplate { values: defaults.iter().copied().collect() }
    }

    /// Parses an `EGL_NONE`-terminated list of attribute/value pairs.
    pub fn from_attrib_list(attrib_list: &[EGLint]) -> Result<ConfigTemplate, Error> {
        let mut template = ConfigTemplate::new();
        for pair in attrib_list.chunks(2) {
            if pair[0] == egl::NONE {
                break;
            }
            let value = *pair.get(1).ok_or(Error::BadAttribute)?;
            template.set(pair[0], value)?;
        }
        template.check_consistency()?;
        Ok(template)
    }

    /// Sets one criterion.
    pub fn set(&mut self, attribute: EGLint, value: EGLint) -> Result<(), Error> {
        let rule = match_rule(attribute).ok_or(Error::BadAttribute)?;
        if value != egl::DONT_CARE {
            let valid = match (rule, attribute) {
                (MatchRule::AtLeast, _) => value >= 0,
                (MatchRule::Mask, egl::SURFACE_TYPE) => {
                    SurfaceTypeMask::from_bits(value).is_some()
                }
                (MatchRule::Mask, _) => RenderableType::from_bits(value).is_some(),
                (_, egl::CONFIG_CAVEAT) => ConfigCaveat::from_egl(value).is_some(),
                (_, egl::COLOR_BUFFER_TYPE) => {
                    value == egl::RGB_BUFFER || value == egl::LUMINANCE_BUFFER
                }
                (_, egl::TRANSPARENT_TYPE) => {
                    value == egl::NONE || value == egl::TRANSPARENT_RGB
                }
                _ => true,
            };
            if !valid {
                return Err(Error::BadAttribute);
            }
        }
        self.values.insert(attribute, value);
        Ok(())
    }

    /// The value requested for an attribute, if the template constrains it.
    pub fn get(&self, attribute: EGLint) -> Option<EGLint> {
        self.values.get(&attribute).copied().filter(|&value| value != egl::DONT_CARE)
    }

    // A luminance buffer has no red, green or blue channel.
    fn check_consistency(&self) -> Result<(), Error> {
        if self.get(egl::COLOR_BUFFER_TYPE) == Some(egl::LUMINANCE_BUFFER) {
            let wants_rgb = [egl::RED_SIZE, egl::GREEN_SIZE, egl::BLUE_SIZE]
                .iter()
                .any(|&attribute| self.get(attribute).unwrap_or(0) > 0);
            if wants_rgb {
                return Err(Error::BadAttribute);
            }
        }
        Ok(())
    }

    /// Returns true if `config` meets or exceeds every constrained attribute.
    pub fn matches(&self, config: &Config) -> bool {
        // A config ID overrides every other criterion.
        if let Some(config_id) = self.get(egl::CONFIG_ID) {
            return config.config_id() == config_id;
        }

        self.values.iter().all(|(&attribute, &wanted)| {
            if wanted == egl::DONT_CARE {
                return true;
            }
            let actual = match config.get_attrib(attribute) {
                None => return true,
                Some(actual) => actual,
            };
            match match_rule(attribute) {
                Some(MatchRule::AtLeast) => actual >= wanted,
                Some(MatchRule::Exact) => actual == wanted,
                Some(MatchRule::Mask) => actual & wanted == wanted,
                Some(MatchRule::Ignore) | None => true,
            }
        })
    }
}

fn selection_order(a: &Config, b: &Config) -> Ordering {
    a.renderable_type()
        .is_empty()
        .cmp(&b.renderable_type().is_empty())
        .then(a.attributes.caveat.cmp(&b.attributes.caveat))
        .then(a.attributes.buffer_size.cmp(&b.attributes.buffer_size))
        .then(a.config_id().cmp(&b.config_id()))
}

struct WellKnownFormat {
    red: EGLint,
    green: EGLint,
    blue: EGLint,
    alpha: EGLint,
    depth: EGLint,
    stencil: EGLint,
}

// Formats guest GLES code routinely asks for.
static WELL_KNOWN_FORMATS: [WellKnownFormat; 6] = [
    WellKnownFormat { red: 5, green: 6, blue: 5, alpha: 0, depth: 0, stencil: 0 },
    WellKnownFormat { red: 5, green: 6, blue: 5, alpha: 0, depth: 16, stencil: 0 },
    WellKnownFormat { red: 8, green: 8, blue: 8, alpha: 0, depth: 0, stencil: 0 },
    WellKnownFormat { red: 8, green: 8, blue: 8, alpha: 0, depth: 24, stencil: 8 },
    WellKnownFormat { red: 8, green: 8, blue: 8, alpha: 8, depth: 0, stencil: 0 },
    WellKnownFormat { red: 8, green: 8, blue: 8, alpha: 8, depth: 24, stencil: 8 },
];

/// The configs of an initialized display, sorted by config ID. Never mutated once built.
#[derive(Debug)]
pub(crate) struct ConfigTable {
    configs: Vec<Config>,
}

impl ConfigTable {
    pub(crate) fn new(
        native_configs: Vec<NativeConfigInfo>,
        renderable_type: RenderableType,
    ) -> ConfigTable {
        let mut native_configs = native_configs;
        native_configs.sort_by_key(|info| info.attributes.config_id);

        let mut configs: Vec<Config> = Vec::with_capacity(native_configs.len());
        for info in native_configs {
            if configs.last().map(Config::config_id) == Some(info.attributes.config_id) {
                warn!("dropping config with duplicate ID {}", info.attributes.config_id);
                continue;
            }

            let mut attributes = info.attributes;
            attributes.renderable_type &= renderable_type;
            attributes.conformant &= renderable_type;
            configs.push(Config {
                handle: ConfigHandle::from_index(configs.len()),
                native: Some(info.native),
                attributes,
            });
        }

        let mut table = ConfigTable { configs };
        table.add_missing_configs();
        table
    }

    // Adds a non-renderable placeholder for every well-known format the driver didn't expose, so
    // that probing clients get a config that fails to render instead of no config at all.
    fn add_missing_configs(&mut self) {
        let mut next_config_id = self.configs.iter().map(Config::config_id).max().unwrap_or(0);
        for format in &WELL_KNOWN_FORMATS {
            if self.configs.iter().any(|config| config.attributes.has_format(format)) {
                continue;
            }

            // Synthesized IDs must sort after the driver's to keep the table ordered by ID.
            next_config_id = match next_config_id.checked_add(1) {
                Some(config_id) => config_id,
                None => {
                    warn!("no config IDs left above {}; not synthesizing missing configs",
                          next_config_id);
                    return;
                }
            };
            let mut attributes =
                ConfigAttributes::rgba(format.red, format.green, format.blue, format.alpha)
                    .with_depth_stencil(format.depth, format.stencil)
                    .with_config_id(next_config_id);
            attributes.renderable_type = RenderableType::empty();
            attributes.conformant = RenderableType::empty();
            attributes.caveat = ConfigCaveat::NonConformant;
            attributes.surface_type = SurfaceTypeMask::PBUFFER;

            debug!("synthesizing missing config {} ({}{}{}{} d{} s{})",
                   next_config_id,
                   format.red,
                   format.green,
                   format.blue,
                   format.alpha,
                   format.depth,
                   format.stencil);
            self.configs.push(Config {
                handle: ConfigHandle::from_index(self.configs.len()),
                native: None,
                attributes,
            });
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.configs.len()
    }

    pub(crate) fn list(&self, out: &mut [ConfigHandle]) -> usize {
        let count = out.len().min(self.configs.len());
        for (slot, config) in out.iter_mut().zip(&self.configs) {
            *slot = config.handle;
        }
        count
    }

    pub(crate) fn choose(
        &self,
        template: &ConfigTemplate,
        out: Option<&mut [ConfigHandle]>,
    ) -> usize {
        let mut matches: Vec<&Config> =
            self.configs.iter().filter(|config| template.matches(config)).collect();
        let out = match out {
            None => return matches.len(),
            Some(out) => out,
        };

        matches.sort_by(|a, b| selection_order(a, b));
        let count = out.len().min(matches.len());
        for (slot, config) in out.iter_mut().zip(matches) {
            *slot = config.handle;
        }
        count
    }

    pub(crate) fn by_handle(&self, handle: ConfigHandle) -> Option<&Config> {
        self.configs.get(handle.index()?)
    }

    pub(crate) fn by_id(&self, config_id: EGLint) -> Option<&Config> {
        self.configs
            .binary_search_by_key(&config_id, Config::config_id)
            .ok()
            .map(|index| &self.configs[index])
    }

    #[inline]
    pub(crate) fn first(&self) -> Option<&Config> {
        self.configs.first()
    }
}
