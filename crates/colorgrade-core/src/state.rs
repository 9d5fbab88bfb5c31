use crate::gs::{CullMode, Graphics};

/// Raster switches that live outside the libobs blend stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RasterFlags {
    cull: CullMode,
    color: [bool; 4],
    depth_test: bool,
    stencil_test: bool,
    stencil_write: bool,
}

impl RasterFlags {
    fn capture<G: Graphics>(gs: &G) -> Self {
        Self {
            cull: gs.cull_mode(),
            color: gs.color_mask(),
            depth_test: gs.depth_test_enabled(),
            stencil_test: gs.stencil_test_enabled(),
            stencil_write: gs.stencil_write_enabled(),
        }
    }

    fn apply<G: Graphics>(&self, gs: &G) {
        let [r, g, b, a] = self.color;
        gs.set_cull_mode(self.cull);
        gs.enable_color(r, g, b, a);
        gs.enable_depth_test(self.depth_test);
        gs.enable_stencil_test(self.stencil_test);
        gs.enable_stencil_write(self.stencil_write);
    }
}

/// Known-good raster state for a full-frame pass.
///
/// Pushes the blend state and switches to: no blending, all color channels,
/// no depth or stencil, no culling. Everything it touched is put back on drop,
/// so early returns and unwinding leave global state as the caller had it.
pub struct RenderState<G: Graphics> {
    gs: G,
    saved: RasterFlags,
}

impl<G: Graphics> RenderState<G> {
    pub fn push(gs: &G) -> Self {
        let saved = RasterFlags::capture(gs);

        gs.blend_state_push();
        gs.reset_blend_state();
        gs.set_cull_mode(CullMode::Neither);
        gs.enable_color(true, true, true, true);
        gs.enable_blending(false);
        gs.enable_depth_test(false);
        gs.enable_stencil_test(false);
        gs.enable_stencil_write(false);

        Self {
            gs: gs.clone(),
            saved,
        }
    }
}

impl<G: Graphics> Drop for RenderState<G> {
    fn drop(&mut self) {
        self.saved.apply(&self.gs);
        self.gs.blend_state_pop();
    }
}

/// Disables depth testing until dropped, then restores the previous setting.
pub struct DepthTestOff<G: Graphics> {
    gs: G,
    prior: bool,
}

impl<G: Graphics> DepthTestOff<G> {
    pub fn new(gs: &G) -> Self {
        let prior = gs.depth_test_enabled();
        gs.enable_depth_test(false);
        Self {
            gs: gs.clone(),
            prior,
        }
    }
}

impl<G: Graphics> Drop for DepthTestOff<G> {
    fn drop(&mut self) {
        self.gs.enable_depth_test(self.prior);
    }
}
