use std::cell::Cell;
use std::os::raw::c_char;
use std::path::Path;

use colorgrade_core::gs::{
    ColorFormat, CullMode, Graphics, TextureFlags, TextureShape, ZStencilFormat,
};
use obs_sys as obs;

use crate::util::{from_cstr, to_cstring};

/// Holds the libobs graphics context for its lifetime.
///
/// Render callbacks already run inside the context; create and destroy do
/// not, so they enter it through this guard.
pub(crate) struct GraphicsContext(());

impl GraphicsContext {
    pub(crate) fn enter() -> Self {
        unsafe { obs::obs_enter_graphics() };
        Self(())
    }
}

impl Drop for GraphicsContext {
    fn drop(&mut self) {
        unsafe { obs::obs_leave_graphics() };
    }
}

/// [`Graphics`] over the libobs `gs_*` API.
///
/// Only valid on the graphics thread or inside a [`GraphicsContext`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ObsGraphics;

fn color_format(format: ColorFormat) -> obs::gs_color_format {
    match format {
        ColorFormat::Unknown => obs::gs_color_format_GS_UNKNOWN,
        ColorFormat::A8 => obs::gs_color_format_GS_A8,
        ColorFormat::R8 => obs::gs_color_format_GS_R8,
        ColorFormat::Rgba => obs::gs_color_format_GS_RGBA,
        ColorFormat::Bgrx => obs::gs_color_format_GS_BGRX,
        ColorFormat::Bgra => obs::gs_color_format_GS_BGRA,
        ColorFormat::R10G10B10A2 => obs::gs_color_format_GS_R10G10B10A2,
        ColorFormat::Rgba16 => obs::gs_color_format_GS_RGBA16,
        ColorFormat::R16 => obs::gs_color_format_GS_R16,
        ColorFormat::Rgba16F => obs::gs_color_format_GS_RGBA16F,
        ColorFormat::Rgba32F => obs::gs_color_format_GS_RGBA32F,
        ColorFormat::Rg16F => obs::gs_color_format_GS_RG16F,
        ColorFormat::Rg32F => obs::gs_color_format_GS_RG32F,
        ColorFormat::R16F => obs::gs_color_format_GS_R16F,
        ColorFormat::R32F => obs::gs_color_format_GS_R32F,
        ColorFormat::Dxt1 => obs::gs_color_format_GS_DXT1,
        ColorFormat::Dxt3 => obs::gs_color_format_GS_DXT3,
        ColorFormat::Dxt5 => obs::gs_color_format_GS_DXT5,
        ColorFormat::R8G8 => obs::gs_color_format_GS_R8G8,
        ColorFormat::RgbaUnorm => obs::gs_color_format_GS_RGBA_UNORM,
        ColorFormat::BgrxUnorm => obs::gs_color_format_GS_BGRX_UNORM,
        ColorFormat::BgraUnorm => obs::gs_color_format_GS_BGRA_UNORM,
        ColorFormat::Rg16 => obs::gs_color_format_GS_RG16,
    }
}

fn from_color_format(format: obs::gs_color_format) -> ColorFormat {
    match format {
        obs::gs_color_format_GS_A8 => ColorFormat::A8,
        obs::gs_color_format_GS_R8 => ColorFormat::R8,
        obs::gs_color_format_GS_RGBA => ColorFormat::Rgba,
        obs::gs_color_format_GS_BGRX => ColorFormat::Bgrx,
        obs::gs_color_format_GS_BGRA => ColorFormat::Bgra,
        obs::gs_color_format_GS_R10G10B10A2 => ColorFormat::R10G10B10A2,
        obs::gs_color_format_GS_RGBA16 => ColorFormat::Rgba16,
        obs::gs_color_format_GS_R16 => ColorFormat::R16,
        obs::gs_color_format_GS_RGBA16F => ColorFormat::Rgba16F,
        obs::gs_color_format_GS_RGBA32F => ColorFormat::Rgba32F,
        obs::gs_color_format_GS_RG16F => ColorFormat::Rg16F,
        obs::gs_color_format_GS_RG32F => ColorFormat::Rg32F,
        obs::gs_color_format_GS_R16F => ColorFormat::R16F,
        obs::gs_color_format_GS_R32F => ColorFormat::R32F,
        obs::gs_color_format_GS_DXT1 => ColorFormat::Dxt1,
        obs::gs_color_format_GS_DXT3 => ColorFormat::Dxt3,
        obs::gs_color_format_GS_DXT5 => ColorFormat::Dxt5,
        obs::gs_color_format_GS_R8G8 => ColorFormat::R8G8,
        obs::gs_color_format_GS_RGBA_UNORM => ColorFormat::RgbaUnorm,
        obs::gs_color_format_GS_BGRX_UNORM => ColorFormat::BgrxUnorm,
        obs::gs_color_format_GS_BGRA_UNORM => ColorFormat::BgraUnorm,
        obs::gs_color_format_GS_RG16 => ColorFormat::Rg16,
        _ => ColorFormat::Unknown,
    }
}

fn zstencil_format(format: ZStencilFormat) -> obs::gs_zstencil_format {
    match format {
        ZStencilFormat::None => obs::gs_zstencil_format_GS_ZS_NONE,
        ZStencilFormat::Z16 => obs::gs_zstencil_format_GS_Z16,
        ZStencilFormat::Z24S8 => obs::gs_zstencil_format_GS_Z24_S8,
        ZStencilFormat::Z32F => obs::gs_zstencil_format_GS_Z32F,
        ZStencilFormat::Z32FS8X24 => obs::gs_zstencil_format_GS_Z32F_S8X24,
    }
}

fn texture_flags(flags: TextureFlags) -> u32 {
    let mut bits = 0;
    if flags.build_mipmaps {
        bits |= obs::GS_BUILD_MIPMAPS;
    }
    if flags.dynamic {
        bits |= obs::GS_DYNAMIC;
    }
    if flags.render_target {
        bits |= obs::GS_RENDER_TARGET;
    }
    bits
}

/// Raster switches libobs can set but not query.
#[derive(Clone, Copy)]
struct RasterSwitches {
    color: [bool; 4],
    depth_test: bool,
    stencil_test: bool,
    stencil_write: bool,
}

thread_local! {
    // Last values set through this backend on the graphics thread, seeded with
    // the state libobs renders sources in.
    static RASTER: Cell<RasterSwitches> = const {
        Cell::new(RasterSwitches {
            color: [true; 4],
            depth_test: false,
            stencil_test: false,
            stencil_write: false,
        })
    };
}

fn raster() -> RasterSwitches {
    RASTER.with(Cell::get)
}

fn update_raster(f: impl FnOnce(&mut RasterSwitches)) {
    RASTER.with(|cell| {
        let mut r = cell.get();
        f(&mut r);
        cell.set(r);
    });
}

fn non_null<T>(ptr: *mut T) -> Option<*mut T> {
    (!ptr.is_null()).then_some(ptr)
}

fn or_null<T>(ptr: Option<*mut T>) -> *mut T {
    ptr.unwrap_or(std::ptr::null_mut())
}

// libobs wants one pointer per mip level (per face for cube maps).
fn level_pointers(data: Option<&[&[u8]]>) -> Option<Vec<*const u8>> {
    data.map(|levels| levels.iter().map(|level| level.as_ptr()).collect())
}

fn as_data_ptr(levels: &mut Option<Vec<*const u8>>) -> *mut *const u8 {
    levels
        .as_mut()
        .map_or(std::ptr::null_mut(), |l| l.as_mut_ptr())
}

impl Graphics for ObsGraphics {
    type Texture = *mut obs::gs_texture_t;
    type ZStencil = *mut obs::gs_zstencil_t;
    type Effect = *mut obs::gs_effect_t;
    type Param = *mut obs::gs_eparam_t;

    fn texture_create(
        &self,
        width: u32,
        height: u32,
        format: ColorFormat,
        levels: u32,
        data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<Self::Texture> {
        let mut ptrs = level_pointers(data);
        non_null(unsafe {
            obs::gs_texture_create(
                width,
                height,
                color_format(format),
                levels,
                as_data_ptr(&mut ptrs),
                texture_flags(flags),
            )
        })
    }

    fn voltexture_create(
        &self,
        width: u32,
        height: u32,
        depth: u32,
        format: ColorFormat,
        levels: u32,
        data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<Self::Texture> {
        let mut ptrs = level_pointers(data);
        non_null(unsafe {
            obs::gs_voltexture_create(
                width,
                height,
                depth,
                color_format(format),
                levels,
                as_data_ptr(&mut ptrs),
                texture_flags(flags),
            )
        })
    }

    fn cubetexture_create(
        &self,
        size: u32,
        format: ColorFormat,
        levels: u32,
        data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<Self::Texture> {
        let mut ptrs = level_pointers(data);
        non_null(unsafe {
            obs::gs_cubetexture_create(
                size,
                color_format(format),
                levels,
                as_data_ptr(&mut ptrs),
                texture_flags(flags),
            )
        })
    }

    fn texture_create_from_file(&self, path: &Path) -> Option<Self::Texture> {
        let path = to_cstring(&path.to_string_lossy());
        non_null(unsafe { obs::gs_texture_create_from_file(path.as_ptr()) })
    }

    fn texture_destroy(&self, tex: Self::Texture) {
        unsafe { obs::gs_texture_destroy(tex) }
    }

    fn voltexture_destroy(&self, tex: Self::Texture) {
        unsafe { obs::gs_voltexture_destroy(tex) }
    }

    fn cubetexture_destroy(&self, tex: Self::Texture) {
        unsafe { obs::gs_cubetexture_destroy(tex) }
    }

    fn texture_width(&self, tex: Self::Texture, shape: TextureShape) -> u32 {
        unsafe {
            match shape {
                TextureShape::Planar => obs::gs_texture_get_width(tex),
                TextureShape::Volumetric => obs::gs_voltexture_get_width(tex),
                TextureShape::Cube => obs::gs_cubetexture_get_size(tex),
            }
        }
    }

    fn texture_height(&self, tex: Self::Texture, shape: TextureShape) -> u32 {
        unsafe {
            match shape {
                TextureShape::Planar => obs::gs_texture_get_height(tex),
                TextureShape::Volumetric => obs::gs_voltexture_get_height(tex),
                TextureShape::Cube => obs::gs_cubetexture_get_size(tex),
            }
        }
    }

    fn texture_depth(&self, tex: Self::Texture) -> u32 {
        unsafe { obs::gs_voltexture_get_depth(tex) }
    }

    fn texture_color_format(&self, tex: Self::Texture, shape: TextureShape) -> ColorFormat {
        let format = unsafe {
            match shape {
                TextureShape::Planar => obs::gs_texture_get_color_format(tex),
                TextureShape::Volumetric => obs::gs_voltexture_get_color_format(tex),
                TextureShape::Cube => obs::gs_cubetexture_get_color_format(tex),
            }
        };
        from_color_format(format)
    }

    fn load_texture(&self, tex: Option<Self::Texture>, unit: u32) {
        unsafe { obs::gs_load_texture(or_null(tex), unit as i32) }
    }

    fn zstencil_create(
        &self,
        width: u32,
        height: u32,
        format: ZStencilFormat,
    ) -> Option<Self::ZStencil> {
        non_null(unsafe { obs::gs_zstencil_create(width, height, zstencil_format(format)) })
    }

    fn zstencil_destroy(&self, zs: Self::ZStencil) {
        unsafe { obs::gs_zstencil_destroy(zs) }
    }

    fn render_target(&self) -> Option<Self::Texture> {
        non_null(unsafe { obs::gs_get_render_target() })
    }

    fn zstencil_target(&self) -> Option<Self::ZStencil> {
        non_null(unsafe { obs::gs_get_zstencil_target() })
    }

    fn set_render_target(&self, tex: Option<Self::Texture>, zs: Option<Self::ZStencil>) {
        unsafe { obs::gs_set_render_target(or_null(tex), or_null(zs)) }
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { obs::gs_set_viewport(x, y, width, height) }
    }

    fn viewport_push(&self) {
        unsafe { obs::gs_viewport_push() }
    }

    fn viewport_pop(&self) {
        unsafe { obs::gs_viewport_pop() }
    }

    fn projection_push(&self) {
        unsafe { obs::gs_projection_push() }
    }

    fn projection_pop(&self) {
        unsafe { obs::gs_projection_pop() }
    }

    fn matrix_push(&self) {
        unsafe { obs::gs_matrix_push() }
    }

    fn matrix_pop(&self) {
        unsafe { obs::gs_matrix_pop() }
    }

    fn matrix_identity(&self) {
        unsafe { obs::gs_matrix_identity() }
    }

    fn ortho(&self, left: f32, right: f32, top: f32, bottom: f32, znear: f32, zfar: f32) {
        unsafe { obs::gs_ortho(left, right, top, bottom, znear, zfar) }
    }

    fn blend_state_push(&self) {
        unsafe { obs::gs_blend_state_push() }
    }

    fn blend_state_pop(&self) {
        unsafe { obs::gs_blend_state_pop() }
    }

    fn reset_blend_state(&self) {
        unsafe { obs::gs_reset_blend_state() }
    }

    fn cull_mode(&self) -> CullMode {
        match unsafe { obs::gs_get_cull_mode() } {
            obs::gs_cull_mode_GS_FRONT => CullMode::Front,
            obs::gs_cull_mode_GS_NEITHER => CullMode::Neither,
            _ => CullMode::Back,
        }
    }

    fn set_cull_mode(&self, mode: CullMode) {
        let mode = match mode {
            CullMode::Back => obs::gs_cull_mode_GS_BACK,
            CullMode::Front => obs::gs_cull_mode_GS_FRONT,
            CullMode::Neither => obs::gs_cull_mode_GS_NEITHER,
        };
        unsafe { obs::gs_set_cull_mode(mode) }
    }

    fn enable_color(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { obs::gs_enable_color(red, green, blue, alpha) }
        update_raster(|r| r.color = [red, green, blue, alpha]);
    }

    fn enable_blending(&self, enable: bool) {
        unsafe { obs::gs_enable_blending(enable) }
    }

    fn enable_depth_test(&self, enable: bool) {
        unsafe { obs::gs_enable_depth_test(enable) }
        update_raster(|r| r.depth_test = enable);
    }

    fn enable_stencil_test(&self, enable: bool) {
        unsafe { obs::gs_enable_stencil_test(enable) }
        update_raster(|r| r.stencil_test = enable);
    }

    fn enable_stencil_write(&self, enable: bool) {
        unsafe { obs::gs_enable_stencil_write(enable) }
        update_raster(|r| r.stencil_write = enable);
    }

    fn color_mask(&self) -> [bool; 4] {
        raster().color
    }

    fn depth_test_enabled(&self) -> bool {
        raster().depth_test
    }

    fn stencil_test_enabled(&self) -> bool {
        raster().stencil_test
    }

    fn stencil_write_enabled(&self) -> bool {
        raster().stencil_write
    }

    fn effect_create_from_file(&self, path: &Path) -> Result<Self::Effect, String> {
        let path = to_cstring(&path.to_string_lossy());
        let mut error: *mut c_char = std::ptr::null_mut();
        let effect = unsafe { obs::gs_effect_create_from_file(path.as_ptr(), &mut error) };

        let message = if error.is_null() {
            None
        } else {
            let message = unsafe { from_cstr(error) };
            unsafe { obs::bfree(error.cast()) };
            Some(message)
        };

        match (non_null(effect), message) {
            (Some(effect), Some(warnings)) => {
                tracing::warn!(%warnings, "effect compiled with diagnostics");
                Ok(effect)
            }
            (Some(effect), None) => Ok(effect),
            (None, message) => Err(message.unwrap_or_else(|| "unknown error".to_owned())),
        }
    }

    fn effect_destroy(&self, effect: Self::Effect) {
        unsafe { obs::gs_effect_destroy(effect) }
    }

    fn effect_param_by_name(&self, effect: Self::Effect, name: &str) -> Option<Self::Param> {
        let name = to_cstring(name);
        non_null(unsafe { obs::gs_effect_get_param_by_name(effect, name.as_ptr()) })
    }

    fn effect_set_texture(&self, param: Self::Param, tex: Option<Self::Texture>) {
        unsafe { obs::gs_effect_set_texture(param, or_null(tex)) }
    }

    // gs_effect_set_vec3/vec4 take libobs' SIMD vector structs; set_val
    // copies the packed floats directly.
    fn effect_set_vec3(&self, param: Self::Param, v: [f32; 3]) {
        unsafe {
            obs::gs_effect_set_val(
                param,
                v.as_ptr().cast(),
                std::mem::size_of_val(&v) as obs::size_t,
            )
        }
    }

    fn effect_set_vec4(&self, param: Self::Param, v: [f32; 4]) {
        unsafe {
            obs::gs_effect_set_val(
                param,
                v.as_ptr().cast(),
                std::mem::size_of_val(&v) as obs::size_t,
            )
        }
    }

    fn effect_loop(&self, effect: Self::Effect, technique: &str) -> bool {
        let technique = to_cstring(technique);
        unsafe { obs::gs_effect_loop(effect, technique.as_ptr()) }
    }

    fn draw_sprite(&self, tex: Option<Self::Texture>, flip: u32, width: u32, height: u32) {
        unsafe { obs::gs_draw_sprite(or_null(tex), flip, width, height) }
    }
}
