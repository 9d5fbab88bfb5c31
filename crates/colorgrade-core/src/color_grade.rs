//! The color grading filter: source capture, grading pass, composite.

use std::path::PathBuf;
use std::time::Instant;

use crate::effect::Effect;
use crate::error::{GraphicsError, GraphicsResult, PassError};
use crate::filter::{FilterContext, FilterHost, PassTimings, RenderOutcome, VideoFilter};
use crate::gs::{ColorFormat, Graphics, ZStencilFormat};
use crate::params::ParameterSet;
use crate::render_target::RenderTarget;
use crate::settings::Settings;
use crate::state::DepthTestOff;
use crate::texture::Texture;

pub const EFFECT_FILE: &str = "effects/color-grade.effect";
pub const TECHNIQUE: &str = "Draw";

pub struct ColorGradeFilter<G: Graphics> {
    gs: G,
    name: String,
    active: bool,
    // Set once the pass has run in the current tick.
    source_updated: bool,
    grade_updated: bool,
    params: ParameterSet,
    effect: Effect<G>,
    rt_source: RenderTarget<G>,
    rt_grade: RenderTarget<G>,
    timings: PassTimings,
}

impl<G: Graphics> ColorGradeFilter<G> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }
}

impl<G: Graphics> VideoFilter<G> for ColorGradeFilter<G> {
    fn create(gs: &G, context: &FilterContext, settings: &dyn Settings) -> GraphicsResult<Self> {
        let params = ParameterSet::parse(settings);

        let path = context
            .effect_path
            .as_deref()
            .ok_or_else(|| GraphicsError::NotFound(PathBuf::from(EFFECT_FILE)))?;
        let effect = Effect::from_file(gs, path)?;

        // Allocate both surfaces up front so a broken graphics backend fails
        // creation instead of the first frame.
        let mut rt_source = RenderTarget::new(gs, ColorFormat::Rgba, ZStencilFormat::None);
        drop(rt_source.render(1, 1)?);
        let mut rt_grade = RenderTarget::new(gs, ColorFormat::Rgba, ZStencilFormat::None);
        drop(rt_grade.render(1, 1)?);

        tracing::debug!(filter = %context.name, path = %path.display(), "color grade created");

        Ok(Self {
            gs: gs.clone(),
            name: context.name.clone(),
            active: true,
            source_updated: false,
            grade_updated: false,
            params,
            effect,
            rt_source,
            rt_grade,
            timings: PassTimings::default(),
        })
    }

    fn update(&mut self, settings: &dyn Settings) {
        self.params = ParameterSet::parse(settings);
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn video_tick(&mut self, _seconds: f32) {
        self.source_updated = false;
        self.grade_updated = false;
    }

    fn video_render(&mut self, host: &mut dyn FilterHost<G>) -> Result<RenderOutcome, PassError> {
        self.timings = PassTimings::default();

        let size = host.target_size().filter(|&(w, h)| w > 0 && h > 0);
        let default_effect = host.default_effect();
        let (Some((width, height)), Some(default_effect), true, true) =
            (size, default_effect, self.active, host.has_parent())
        else {
            host.skip();
            return Ok(RenderOutcome::Skipped);
        };

        if !self.source_updated {
            let start = Instant::now();
            if host.process_filter_begin() {
                let _scope = self
                    .rt_source
                    .render(width, height)
                    .map_err(|e| PassError::new("source", e))?;
                host.process_filter_end(default_effect, width, height);
            }
            self.source_updated = true;
            self.timings.source = Some(start.elapsed());
        }

        if !self.grade_updated {
            let start = Instant::now();
            let source = self.rt_source.texture();
            {
                let _scope = self
                    .rt_grade
                    .render(width, height)
                    .map_err(|e| PassError::new("grade", e))?;
                bind_uniforms(&self.effect, &self.params, source.as_ref());
                self.effect
                    .draw(TECHNIQUE, |gs| gs.draw_sprite(None, 0, width, height));
            }
            self.grade_updated = true;
            self.timings.grade = Some(start.elapsed());
        }

        let start = Instant::now();
        let graded = self.rt_grade.texture();
        let shader = Effect::borrowed(&self.gs, default_effect);
        let image = shader.parameter("image");
        {
            let _depth = DepthTestOff::new(&self.gs);
            shader.draw(TECHNIQUE, |gs| {
                if let Some(image) = &image {
                    image.set_texture(graded.as_ref());
                }
                gs.draw_sprite(None, 0, width, height);
            });
        }
        self.timings.composite = Some(start.elapsed());

        Ok(RenderOutcome::Rendered)
    }

    fn pass_timings(&self) -> PassTimings {
        self.timings
    }
}

// Parameters the effect does not declare are skipped.
fn bind_uniforms<G: Graphics>(
    effect: &Effect<G>,
    params: &ParameterSet,
    image: Option<&Texture<G>>,
) {
    if let Some(p) = effect.parameter("image") {
        p.set_texture(image);
    }

    let float4 = [
        ("pLift", params.lift),
        ("pGamma", params.gamma),
        ("pGain", params.gain),
        ("pOffset", params.offset),
        ("pCorrection", params.correction),
    ];
    for (name, value) in float4 {
        if let Some(p) = effect.parameter(name) {
            p.set_float4(value);
        }
    }

    let float3 = [
        ("pTintLow", params.tint_low),
        ("pTintMid", params.tint_mid),
        ("pTintHig", params.tint_high),
    ];
    for (name, value) in float3 {
        if let Some(p) = effect.parameter(name) {
            p.set_float3(value);
        }
    }
}
