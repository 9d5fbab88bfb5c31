use std::path::Path;

use crate::error::{invalid, GraphicsError, GraphicsResult};
use crate::gs::{ColorFormat, Graphics, TextureFlags, TextureShape};

const CUBE_FACES: usize = 6;

/// A GPU texture of any shape.
///
/// Owning textures release the handle through the shape-specific destroy call
/// when dropped. Aliases created with [`Texture::borrowed`] never release it.
pub struct Texture<G: Graphics> {
    gs: G,
    handle: G::Texture,
    shape: TextureShape,
    owner: bool,
}

impl<G: Graphics> Texture<G> {
    pub fn create_2d(
        gs: &G,
        width: u32,
        height: u32,
        format: ColorFormat,
        mip_levels: u32,
        mip_data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> GraphicsResult<Self> {
        if width == 0 {
            return Err(invalid("width must be at least 1"));
        }
        if height == 0 {
            return Err(invalid("height must be at least 1"));
        }
        check_mips(mip_levels, flags, &[width, height])?;
        check_data(mip_data, mip_levels as usize)?;

        let handle = gs
            .texture_create(width, height, format, mip_levels, mip_data, flags)
            .ok_or_else(|| GraphicsError::ResourceCreation("texture".into()))?;
        Ok(Self::owned(gs, handle, TextureShape::Planar))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_volume(
        gs: &G,
        width: u32,
        height: u32,
        depth: u32,
        format: ColorFormat,
        mip_levels: u32,
        mip_data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> GraphicsResult<Self> {
        if width == 0 {
            return Err(invalid("width must be at least 1"));
        }
        if height == 0 {
            return Err(invalid("height must be at least 1"));
        }
        if depth == 0 {
            return Err(invalid("depth must be at least 1"));
        }
        check_mips(mip_levels, flags, &[width, height, depth])?;
        check_data(mip_data, mip_levels as usize)?;

        let handle = gs
            .voltexture_create(width, height, depth, format, mip_levels, mip_data, flags)
            .ok_or_else(|| GraphicsError::ResourceCreation("volume texture".into()))?;
        Ok(Self::owned(gs, handle, TextureShape::Volumetric))
    }

    /// `mip_data` is face-major: all levels of +X, then -X, and so on.
    pub fn create_cube(
        gs: &G,
        size: u32,
        format: ColorFormat,
        mip_levels: u32,
        mip_data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> GraphicsResult<Self> {
        if size == 0 {
            return Err(invalid("size must be at least 1"));
        }
        check_mips(mip_levels, flags, &[size])?;
        check_data(mip_data, mip_levels as usize * CUBE_FACES)?;

        let handle = gs
            .cubetexture_create(size, format, mip_levels, mip_data, flags)
            .ok_or_else(|| GraphicsError::ResourceCreation("cube texture".into()))?;
        Ok(Self::owned(gs, handle, TextureShape::Cube))
    }

    pub fn from_file(gs: &G, path: &Path) -> GraphicsResult<Self> {
        if !gs.file_exists(path) {
            return Err(GraphicsError::NotFound(path.to_path_buf()));
        }

        let handle = gs.texture_create_from_file(path).ok_or_else(|| {
            GraphicsError::ResourceCreation(format!("texture from {}", path.display()))
        })?;
        Ok(Self::owned(gs, handle, TextureShape::Planar))
    }

    /// Non-owning alias of a handle owned elsewhere.
    pub fn borrowed(gs: &G, handle: G::Texture, shape: TextureShape) -> Self {
        Self {
            gs: gs.clone(),
            handle,
            shape,
            owner: false,
        }
    }

    fn owned(gs: &G, handle: G::Texture, shape: TextureShape) -> Self {
        Self {
            gs: gs.clone(),
            handle,
            shape,
            owner: true,
        }
    }

    pub fn bind(&self, slot: u32) {
        self.gs.load_texture(Some(self.handle), slot);
    }

    pub fn handle(&self) -> G::Texture {
        self.handle
    }

    pub fn shape(&self) -> TextureShape {
        self.shape
    }

    pub fn is_owner(&self) -> bool {
        self.owner
    }

    pub fn width(&self) -> u32 {
        self.gs.texture_width(self.handle, self.shape)
    }

    pub fn height(&self) -> u32 {
        self.gs.texture_height(self.handle, self.shape)
    }

    pub fn depth(&self) -> u32 {
        match self.shape {
            TextureShape::Planar => 1,
            TextureShape::Volumetric => self.gs.texture_depth(self.handle),
            TextureShape::Cube => CUBE_FACES as u32,
        }
    }

    pub fn format(&self) -> ColorFormat {
        self.gs.texture_color_format(self.handle, self.shape)
    }
}

impl<G: Graphics> Drop for Texture<G> {
    fn drop(&mut self) {
        if !self.owner {
            return;
        }
        match self.shape {
            TextureShape::Planar => self.gs.texture_destroy(self.handle),
            TextureShape::Volumetric => self.gs.voltexture_destroy(self.handle),
            TextureShape::Cube => self.gs.cubetexture_destroy(self.handle),
        }
    }
}

fn check_mips(mip_levels: u32, flags: TextureFlags, dims: &[u32]) -> GraphicsResult<()> {
    if mip_levels == 0 {
        return Err(invalid("mip_levels must be at least 1"));
    }
    if (mip_levels > 1 || flags.build_mipmaps) && !dims.iter().all(|d| d.is_power_of_two()) {
        return Err(invalid("mip mapping requires power of two dimensions"));
    }
    Ok(())
}

fn check_data(data: Option<&[&[u8]]>, expected: usize) -> GraphicsResult<()> {
    match data {
        Some(levels) if levels.len() != expected => Err(invalid(format!(
            "expected {expected} mip data slices, got {}",
            levels.len()
        ))),
        _ => Ok(()),
    }
}
