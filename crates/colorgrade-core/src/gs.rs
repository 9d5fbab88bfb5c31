//! The graphics subsystem as seen by the filter core.
//!
//! [`Graphics`] mirrors the small slice of the libobs `gs_*` API the filter
//! needs: texture and depth buffer allocation, render target switching, the
//! viewport/projection/matrix stacks, blend and raster state, and effect
//! parameters. Handles are opaque `Copy` values owned by whoever created them;
//! the wrappers in [`crate::texture`], [`crate::render_target`] and
//! [`crate::effect`] decide when they are released.
//!
//! All calls must happen on the host's graphics thread.

use std::fmt::Debug;
use std::path::Path;

#[cfg(test)]
pub(crate) mod mock;

/// Pixel formats, in libobs `gs_color_format` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    Unknown,
    A8,
    R8,
    Rgba,
    Bgrx,
    Bgra,
    R10G10B10A2,
    Rgba16,
    R16,
    Rgba16F,
    Rgba32F,
    Rg16F,
    Rg32F,
    R16F,
    R32F,
    Dxt1,
    Dxt3,
    Dxt5,
    R8G8,
    RgbaUnorm,
    BgrxUnorm,
    BgraUnorm,
    Rg16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZStencilFormat {
    None,
    Z16,
    Z24S8,
    Z32F,
    Z32FS8X24,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Back,
    Front,
    Neither,
}

/// Shape of a GPU texture. Decides which destroy and query calls apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureShape {
    Planar,
    Volumetric,
    Cube,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureFlags {
    pub dynamic: bool,
    pub build_mipmaps: bool,
    pub render_target: bool,
}

impl TextureFlags {
    pub const NONE: Self = Self {
        dynamic: false,
        build_mipmaps: false,
        render_target: false,
    };

    pub const RENDER_TARGET: Self = Self {
        dynamic: false,
        build_mipmaps: false,
        render_target: true,
    };
}

pub trait Graphics: Clone {
    type Texture: Copy + PartialEq + Debug;
    type ZStencil: Copy + PartialEq + Debug;
    type Effect: Copy + PartialEq + Debug;
    type Param: Copy + PartialEq + Debug;

    /// Existence check used before handing a path to the graphics subsystem.
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    // Textures. `data` holds one slice per mip level (per face and level for
    // cube maps) and has already been validated by the caller.
    fn texture_create(
        &self,
        width: u32,
        height: u32,
        format: ColorFormat,
        levels: u32,
        data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<Self::Texture>;
    #[allow(clippy::too_many_arguments)]
    fn voltexture_create(
        &self,
        width: u32,
        height: u32,
        depth: u32,
        format: ColorFormat,
        levels: u32,
        data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<Self::Texture>;
    fn cubetexture_create(
        &self,
        size: u32,
        format: ColorFormat,
        levels: u32,
        data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<Self::Texture>;
    fn texture_create_from_file(&self, path: &Path) -> Option<Self::Texture>;

    fn texture_destroy(&self, tex: Self::Texture);
    fn voltexture_destroy(&self, tex: Self::Texture);
    fn cubetexture_destroy(&self, tex: Self::Texture);

    fn texture_width(&self, tex: Self::Texture, shape: TextureShape) -> u32;
    fn texture_height(&self, tex: Self::Texture, shape: TextureShape) -> u32;
    /// Only meaningful for volumetric textures.
    fn texture_depth(&self, tex: Self::Texture) -> u32;
    fn texture_color_format(&self, tex: Self::Texture, shape: TextureShape) -> ColorFormat;
    fn load_texture(&self, tex: Option<Self::Texture>, unit: u32);

    // Render targets.
    fn zstencil_create(
        &self,
        width: u32,
        height: u32,
        format: ZStencilFormat,
    ) -> Option<Self::ZStencil>;
    fn zstencil_destroy(&self, zs: Self::ZStencil);
    fn render_target(&self) -> Option<Self::Texture>;
    fn zstencil_target(&self) -> Option<Self::ZStencil>;
    fn set_render_target(&self, tex: Option<Self::Texture>, zs: Option<Self::ZStencil>);
    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn viewport_push(&self);
    fn viewport_pop(&self);
    fn projection_push(&self);
    fn projection_pop(&self);
    fn matrix_push(&self);
    fn matrix_pop(&self);
    fn matrix_identity(&self);
    fn ortho(&self, left: f32, right: f32, top: f32, bottom: f32, znear: f32, zfar: f32);

    // Raster and blend state.
    fn blend_state_push(&self);
    fn blend_state_pop(&self);
    fn reset_blend_state(&self);
    fn cull_mode(&self) -> CullMode;
    fn set_cull_mode(&self, mode: CullMode);
    fn enable_color(&self, red: bool, green: bool, blue: bool, alpha: bool);
    fn enable_blending(&self, enable: bool);
    fn enable_depth_test(&self, enable: bool);
    fn enable_stencil_test(&self, enable: bool);
    fn enable_stencil_write(&self, enable: bool);
    /// Channel write mask as `[red, green, blue, alpha]`.
    fn color_mask(&self) -> [bool; 4];
    fn depth_test_enabled(&self) -> bool;
    fn stencil_test_enabled(&self) -> bool;
    fn stencil_write_enabled(&self) -> bool;

    // Effects. The error string carries the compiler output, if any.
    fn effect_create_from_file(&self, path: &Path) -> Result<Self::Effect, String>;
    fn effect_destroy(&self, effect: Self::Effect);
    fn effect_param_by_name(&self, effect: Self::Effect, name: &str) -> Option<Self::Param>;
    fn effect_set_texture(&self, param: Self::Param, tex: Option<Self::Texture>);
    fn effect_set_vec3(&self, param: Self::Param, v: [f32; 3]);
    fn effect_set_vec4(&self, param: Self::Param, v: [f32; 4]);
    /// Advances the technique's pass loop; `false` once all passes ran.
    fn effect_loop(&self, effect: Self::Effect, technique: &str) -> bool;
    fn draw_sprite(&self, tex: Option<Self::Texture>, flip: u32, width: u32, height: u32);
}
