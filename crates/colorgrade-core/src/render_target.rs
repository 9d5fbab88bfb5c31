use crate::error::{invalid, GraphicsError, GraphicsResult};
use crate::gs::{ColorFormat, Graphics, TextureFlags, ZStencilFormat};
use crate::state::RenderState;
use crate::texture::Texture;

/// An offscreen surface backed by a single render-target texture.
///
/// The backing texture (and depth buffer, if a depth format was requested) is
/// allocated lazily by [`RenderTarget::render`] and replaced whenever the
/// requested size changes.
pub struct RenderTarget<G: Graphics> {
    gs: G,
    color_format: ColorFormat,
    zstencil_format: ZStencilFormat,
    texture: Option<Texture<G>>,
    zstencil: Option<G::ZStencil>,
    width: u32,
    height: u32,
}

impl<G: Graphics> RenderTarget<G> {
    pub fn new(gs: &G, color_format: ColorFormat, zstencil_format: ZStencilFormat) -> Self {
        Self {
            gs: gs.clone(),
            color_format,
            zstencil_format,
            texture: None,
            zstencil: None,
            width: 0,
            height: 0,
        }
    }

    /// Redirects drawing into this target until the returned scope is dropped.
    ///
    /// The scope saves the active render target, viewport, projection and
    /// model matrix, sets an orthographic projection covering
    /// `width` x `height` pixels and pushes a [`RenderState`].
    pub fn render(&mut self, width: u32, height: u32) -> GraphicsResult<RenderScope<'_, G>> {
        if width == 0 || height == 0 {
            return Err(invalid(format!(
                "render target size must be non-zero, got {width}x{height}"
            )));
        }
        self.ensure_size(width, height)?;

        let gs = self.gs.clone();
        let tex = self.texture.as_ref().map(Texture::handle);
        let saved_target = gs.render_target();
        let saved_zstencil = gs.zstencil_target();

        gs.viewport_push();
        gs.projection_push();
        gs.matrix_push();
        gs.matrix_identity();

        gs.set_render_target(tex, self.zstencil);
        gs.set_viewport(0, 0, width as i32, height as i32);
        gs.ortho(0.0, width as f32, 0.0, height as f32, -1.0, 1.0);
        let state = RenderState::push(&gs);

        Ok(RenderScope {
            target: self,
            saved_target,
            saved_zstencil,
            state: Some(state),
        })
    }

    /// Non-owning alias of the current backing texture.
    pub fn texture(&self) -> Option<Texture<G>> {
        self.texture
            .as_ref()
            .map(|t| Texture::borrowed(&self.gs, t.handle(), t.shape()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    pub fn zstencil_format(&self) -> ZStencilFormat {
        self.zstencil_format
    }

    fn ensure_size(&mut self, width: u32, height: u32) -> GraphicsResult<()> {
        if self.texture.is_some() && self.width == width && self.height == height {
            return Ok(());
        }

        self.release();

        let texture = Texture::create_2d(
            &self.gs,
            width,
            height,
            self.color_format,
            1,
            None,
            TextureFlags::RENDER_TARGET,
        )?;
        let zstencil = match self.zstencil_format {
            ZStencilFormat::None => None,
            format => Some(
                self.gs
                    .zstencil_create(width, height, format)
                    .ok_or_else(|| GraphicsError::ResourceCreation("depth buffer".into()))?,
            ),
        };

        tracing::debug!(width, height, "render target resized");
        self.texture = Some(texture);
        self.zstencil = zstencil;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn release(&mut self) {
        self.texture = None;
        if let Some(zs) = self.zstencil.take() {
            self.gs.zstencil_destroy(zs);
        }
        self.width = 0;
        self.height = 0;
    }
}

impl<G: Graphics> Drop for RenderTarget<G> {
    fn drop(&mut self) {
        self.release();
    }
}

/// An open render pass into a [`RenderTarget`]. Dropping it ends the pass.
pub struct RenderScope<'a, G: Graphics> {
    target: &'a mut RenderTarget<G>,
    saved_target: Option<G::Texture>,
    saved_zstencil: Option<G::ZStencil>,
    state: Option<RenderState<G>>,
}

impl<G: Graphics> RenderScope<'_, G> {
    pub fn width(&self) -> u32 {
        self.target.width
    }

    pub fn height(&self) -> u32 {
        self.target.height
    }
}

impl<G: Graphics> Drop for RenderScope<'_, G> {
    fn drop(&mut self) {
        drop(self.state.take());

        let gs = &self.target.gs;
        gs.set_render_target(self.saved_target, self.saved_zstencil);
        gs.matrix_pop();
        gs.projection_pop();
        gs.viewport_pop();
    }
}
