// emugl-egl/src/egl.rs
//
//! The subset of EGL 1.4 types and enumerants the registry understands.
//!
//! Values are those of the Khronos `egl.h` header.

#![allow(missing_docs)]

pub type EGLint = i32;
pub type EGLenum = u32;

pub const FALSE: EGLint = 0;
pub const TRUE: EGLint = 1;
pub const DONT_CARE: EGLint = -1;

// Errors.
pub const SUCCESS: EGLint = 0x3000;
pub const NOT_INITIALIZED: EGLint = 0x3001;
pub const BAD_ACCESS: EGLint = 0x3002;
pub const BAD_ALLOC: EGLint = 0x3003;
pub const BAD_ATTRIBUTE: EGLint = 0x3004;
pub const BAD_CONFIG: EGLint = 0x3005;
pub const BAD_CONTEXT: EGLint = 0x3006;
pub const BAD_CURRENT_SURFACE: EGLint = 0x3007;
pub const BAD_DISPLAY: EGLint = 0x3008;
pub const BAD_MATCH: EGLint = 0x3009;
pub const BAD_NATIVE_PIXMAP: EGLint = 0x300A;
pub const BAD_NATIVE_WINDOW: EGLint = 0x300B;
pub const BAD_PARAMETER: EGLint = 0x300C;
pub const BAD_SURFACE: EGLint = 0x300D;
pub const CONTEXT_LOST: EGLint = 0x300E;

// Config attributes.
pub const BUFFER_SIZE: EGLint = 0x3020;
pub const ALPHA_SIZE: EGLint = 0x3021;
pub const BLUE_SIZE: EGLint = 0x3022;
pub const GREEN_SIZE: EGLint = 0x3023;
pub const RED_SIZE: EGLint = 0x3024;
pub const DEPTH_SIZE: EGLint = 0x3025;
pub const STENCIL_SIZE: EGLint = 0x3026;
pub const CONFIG_CAVEAT: EGLint = 0x3027;
pub const CONFIG_ID: EGLint = 0x3028;
pub const LEVEL: EGLint = 0x3029;
pub const MAX_PBUFFER_HEIGHT: EGLint = 0x302A;
pub const MAX_PBUFFER_PIXELS: EGLint = 0x302B;
pub const MAX_PBUFFER_WIDTH: EGLint = 0x302C;
pub const NATIVE_RENDERABLE: EGLint = 0x302D;
pub const NATIVE_VISUAL_ID: EGLint = 0x302E;
pub const NATIVE_VISUAL_TYPE: EGLint = 0x302F;
pub const SAMPLES: EGLint = 0x3031;
pub const SAMPLE_BUFFERS: EGLint = 0x3032;
pub const SURFACE_TYPE: EGLint = 0x3033;
pub const TRANSPARENT_TYPE: EGLint = 0x3034;
pub const TRANSPARENT_BLUE_VALUE: EGLint = 0x3035;
pub const TRANSPARENT_GREEN_VALUE: EGLint = 0x3036;
pub const TRANSPARENT_RED_VALUE: EGLint = 0x3037;
pub const NONE: EGLint = 0x3038;
pub const BIND_TO_TEXTURE_RGB: EGLint = 0x3039;
pub const BIND_TO_TEXTURE_RGBA: EGLint = 0x303A;
pub const MIN_SWAP_INTERVAL: EGLint = 0x303B;
pub const MAX_SWAP_INTERVAL: EGLint = 0x303C;
pub const LUMINANCE_SIZE: EGLint = 0x303D;
pub const ALPHA_MASK_SIZE: EGLint = 0x303E;
pub const COLOR_BUFFER_TYPE: EGLint = 0x303F;
pub const RENDERABLE_TYPE: EGLint = 0x3040;
pub const MATCH_NATIVE_PIXMAP: EGLint = 0x3041;
pub const CONFORMANT: EGLint = 0x3042;

// Attribute values.
pub const SLOW_CONFIG: EGLint = 0x3050;
pub const NON_CONFORMANT_CONFIG: EGLint = 0x3051;
pub const TRANSPARENT_RGB: EGLint = 0x3052;
pub const RGB_BUFFER: EGLint = 0x308E;
pub const LUMINANCE_BUFFER: EGLint = 0x308F;

// SURFACE_TYPE bits.
pub const PBUFFER_BIT: EGLint = 0x0001;
pub const PIXMAP_BIT: EGLint = 0x0002;
pub const WINDOW_BIT: EGLint = 0x0004;

// RENDERABLE_TYPE and CONFORMANT bits.
pub const OPENGL_ES_BIT: EGLint = 0x0001;
pub const OPENVG_BIT: EGLint = 0x0002;
pub const OPENGL_ES2_BIT: EGLint = 0x0004;
pub const OPENGL_BIT: EGLint = 0x0008;
pub const OPENGL_ES3_BIT_KHR: EGLint = 0x0040;
