use std::path::Path;

use crate::error::{GraphicsError, GraphicsResult};
use crate::gs::Graphics;
use crate::texture::Texture;

/// A compiled effect (shader program with techniques and named parameters).
pub struct Effect<G: Graphics> {
    gs: G,
    handle: G::Effect,
    owner: bool,
}

impl<G: Graphics> Effect<G> {
    pub fn from_file(gs: &G, path: &Path) -> GraphicsResult<Self> {
        if !gs.file_exists(path) {
            return Err(GraphicsError::NotFound(path.to_path_buf()));
        }

        let handle = gs.effect_create_from_file(path).map_err(|e| {
            GraphicsError::RuntimeUnavailable(format!("loading {} failed: {e}", path.display()))
        })?;
        Ok(Self {
            gs: gs.clone(),
            handle,
            owner: true,
        })
    }

    /// Wraps an effect owned by the host, e.g. one of its base effects.
    pub fn borrowed(gs: &G, handle: G::Effect) -> Self {
        Self {
            gs: gs.clone(),
            handle,
            owner: false,
        }
    }

    pub fn handle(&self) -> G::Effect {
        self.handle
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    pub fn parameter(&self, name: &str) -> Option<Parameter<'_, G>> {
        self.gs
            .effect_param_by_name(self.handle, name)
            .map(|handle| Parameter { gs: &self.gs, handle })
    }

    /// Runs `draw` once per pass of `technique`.
    pub fn draw(&self, technique: &str, mut draw: impl FnMut(&G)) {
        while self.gs.effect_loop(self.handle, technique) {
            draw(&self.gs);
        }
    }
}

impl<G: Graphics> Drop for Effect<G> {
    fn drop(&mut self) {
        if self.owner {
            self.gs.effect_destroy(self.handle);
        }
    }
}

pub struct Parameter<'a, G: Graphics> {
    gs: &'a G,
    handle: G::Param,
}

impl<G: Graphics> Parameter<'_, G> {
    pub fn set_texture(&self, tex: Option<&Texture<G>>) {
        self.gs.effect_set_texture(self.handle, tex.map(Texture::handle));
    }

    pub fn set_float3(&self, v: [f32; 3]) {
        self.gs.effect_set_vec3(self.handle, v);
    }

    pub fn set_float4(&self, v: [f32; 4]) {
        self.gs.effect_set_vec4(self.handle, v);
    }
}
