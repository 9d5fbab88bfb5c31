//! Recording graphics backend for unit tests.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{ColorFormat, CullMode, Graphics, TextureFlags, TextureShape, ZStencilFormat};
use crate::filter::FilterHost;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextureRecord {
    pub shape: TextureShape,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub format: ColorFormat,
    pub levels: u32,
    pub flags: TextureFlags,
    pub destroyed: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParamValue {
    Texture(Option<u32>),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawRecord {
    pub target: Option<u32>,
    pub texture: Option<u32>,
    pub technique: Option<String>,
    pub width: u32,
    pub height: u32,
    pub depth_test: bool,
}

#[derive(Debug)]
pub(crate) struct EffectRecord {
    pub params: Vec<String>,
    pub destroyed: u32,
    looping: bool,
}

#[derive(Debug)]
pub(crate) struct MockState {
    next_id: u32,
    pub fail_creates: bool,
    pub files: HashSet<PathBuf>,
    pub effect_files: HashMap<PathBuf, Result<Vec<String>, String>>,

    pub textures: HashMap<u32, TextureRecord>,
    pub destroy_calls: Vec<(TextureShape, u32)>,
    pub zstencils: HashMap<u32, (u32, u32, u32)>,
    pub effects: HashMap<u32, EffectRecord>,
    pub params: HashMap<u32, String>,
    pub param_sets: Vec<(String, ParamValue)>,
    pub loaded: Vec<(Option<u32>, u32)>,

    pub render_target: Option<u32>,
    pub zstencil_target: Option<u32>,
    pub target_switches: u32,
    pub viewport: (i32, i32, i32, i32),
    pub viewport_depth: i32,
    pub projection_depth: i32,
    pub matrix_depth: i32,
    pub blend_depth: i32,
    blend_saved: Vec<bool>,
    pub ortho: Option<[f32; 6]>,

    pub cull: CullMode,
    pub blending: bool,
    pub color_mask: [bool; 4],
    pub depth_test: bool,
    pub stencil_test: bool,
    pub stencil_write: bool,

    technique: Option<String>,
    pub draws: Vec<DrawRecord>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            next_id: 1,
            fail_creates: false,
            files: HashSet::new(),
            effect_files: HashMap::new(),
            textures: HashMap::new(),
            destroy_calls: Vec::new(),
            zstencils: HashMap::new(),
            effects: HashMap::new(),
            params: HashMap::new(),
            param_sets: Vec::new(),
            loaded: Vec::new(),
            render_target: None,
            zstencil_target: None,
            target_switches: 0,
            viewport: (0, 0, 0, 0),
            viewport_depth: 0,
            projection_depth: 0,
            matrix_depth: 0,
            blend_depth: 0,
            blend_saved: Vec::new(),
            ortho: None,
            cull: CullMode::Back,
            blending: true,
            color_mask: [true; 4],
            depth_test: true,
            stencil_test: false,
            stencil_write: false,
            technique: None,
            draws: Vec::new(),
        }
    }
}

impl MockState {
    fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn live_textures(&self) -> usize {
        self.textures.values().filter(|t| t.destroyed == 0).count()
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.param_sets
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn draws_into(&self, target: Option<u32>) -> usize {
        self.draws.iter().filter(|d| d.target == target).count()
    }

    fn add_texture(&mut self, record: TextureRecord) -> Option<u32> {
        if self.fail_creates {
            return None;
        }
        let id = self.id();
        self.textures.insert(id, record);
        Some(id)
    }

    fn destroy(&mut self, tex: u32, shape: TextureShape) {
        self.destroy_calls.push((shape, tex));
        if let Some(t) = self.textures.get_mut(&tex) {
            t.destroyed += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MockGraphics {
    state: Rc<RefCell<MockState>>,
}

impl MockGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, MockState> {
        self.state.borrow_mut()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        self.state_mut().files.insert(path.into());
    }

    pub fn add_effect_file(&self, path: impl Into<PathBuf>, params: &[&str]) {
        let path = path.into();
        let mut s = self.state_mut();
        s.files.insert(path.clone());
        s.effect_files
            .insert(path, Ok(params.iter().map(|p| p.to_string()).collect()));
    }

    pub fn add_broken_effect_file(&self, path: impl Into<PathBuf>, error: &str) {
        let path = path.into();
        let mut s = self.state_mut();
        s.files.insert(path.clone());
        s.effect_files.insert(path, Err(error.to_string()));
    }

    /// Registers a host-owned effect and returns its handle.
    pub fn builtin_effect(&self, params: &[&str]) -> u32 {
        let mut s = self.state_mut();
        let id = s.id();
        s.effects.insert(
            id,
            EffectRecord {
                params: params.iter().map(|p| p.to_string()).collect(),
                destroyed: 0,
                looping: false,
            },
        );
        id
    }
}

impl Graphics for MockGraphics {
    type Texture = u32;
    type ZStencil = u32;
    type Effect = u32;
    type Param = u32;

    fn file_exists(&self, path: &Path) -> bool {
        self.state().files.contains(path)
    }

    fn texture_create(
        &self,
        width: u32,
        height: u32,
        format: ColorFormat,
        levels: u32,
        _data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<u32> {
        self.state_mut().add_texture(TextureRecord {
            shape: TextureShape::Planar,
            width,
            height,
            depth: 1,
            format,
            levels,
            flags,
            destroyed: 0,
        })
    }

    fn voltexture_create(
        &self,
        width: u32,
        height: u32,
        depth: u32,
        format: ColorFormat,
        levels: u32,
        _data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<u32> {
        self.state_mut().add_texture(TextureRecord {
            shape: TextureShape::Volumetric,
            width,
            height,
            depth,
            format,
            levels,
            flags,
            destroyed: 0,
        })
    }

    fn cubetexture_create(
        &self,
        size: u32,
        format: ColorFormat,
        levels: u32,
        _data: Option<&[&[u8]]>,
        flags: TextureFlags,
    ) -> Option<u32> {
        self.state_mut().add_texture(TextureRecord {
            shape: TextureShape::Cube,
            width: size,
            height: size,
            depth: 6,
            format,
            levels,
            flags,
            destroyed: 0,
        })
    }

    fn texture_create_from_file(&self, path: &Path) -> Option<u32> {
        // Image files registered through `add_file` decode to 16x8 RGBA.
        if !self.state().files.contains(path) {
            return None;
        }
        self.state_mut().add_texture(TextureRecord {
            shape: TextureShape::Planar,
            width: 16,
            height: 8,
            depth: 1,
            format: ColorFormat::Rgba,
            levels: 1,
            flags: TextureFlags::NONE,
            destroyed: 0,
        })
    }

    fn texture_destroy(&self, tex: u32) {
        self.state_mut().destroy(tex, TextureShape::Planar);
    }

    fn voltexture_destroy(&self, tex: u32) {
        self.state_mut().destroy(tex, TextureShape::Volumetric);
    }

    fn cubetexture_destroy(&self, tex: u32) {
        self.state_mut().destroy(tex, TextureShape::Cube);
    }

    fn texture_width(&self, tex: u32, _shape: TextureShape) -> u32 {
        self.state().textures.get(&tex).map_or(0, |t| t.width)
    }

    fn texture_height(&self, tex: u32, _shape: TextureShape) -> u32 {
        self.state().textures.get(&tex).map_or(0, |t| t.height)
    }

    fn texture_depth(&self, tex: u32) -> u32 {
        self.state().textures.get(&tex).map_or(0, |t| t.depth)
    }

    fn texture_color_format(&self, tex: u32, _shape: TextureShape) -> ColorFormat {
        self.state()
            .textures
            .get(&tex)
            .map_or(ColorFormat::Unknown, |t| t.format)
    }

    fn load_texture(&self, tex: Option<u32>, unit: u32) {
        self.state_mut().loaded.push((tex, unit));
    }

    fn zstencil_create(&self, width: u32, height: u32, _format: ZStencilFormat) -> Option<u32> {
        let mut s = self.state_mut();
        if s.fail_creates {
            return None;
        }
        let id = s.id();
        s.zstencils.insert(id, (width, height, 0));
        Some(id)
    }

    fn zstencil_destroy(&self, zs: u32) {
        if let Some(z) = self.state_mut().zstencils.get_mut(&zs) {
            z.2 += 1;
        }
    }

    fn render_target(&self) -> Option<u32> {
        self.state().render_target
    }

    fn zstencil_target(&self) -> Option<u32> {
        self.state().zstencil_target
    }

    fn set_render_target(&self, tex: Option<u32>, zs: Option<u32>) {
        let mut s = self.state_mut();
        s.render_target = tex;
        s.zstencil_target = zs;
        s.target_switches += 1;
    }

    fn set_viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state_mut().viewport = (x, y, width, height);
    }

    fn viewport_push(&self) {
        self.state_mut().viewport_depth += 1;
    }

    fn viewport_pop(&self) {
        self.state_mut().viewport_depth -= 1;
    }

    fn projection_push(&self) {
        self.state_mut().projection_depth += 1;
    }

    fn projection_pop(&self) {
        self.state_mut().projection_depth -= 1;
    }

    fn matrix_push(&self) {
        self.state_mut().matrix_depth += 1;
    }

    fn matrix_pop(&self) {
        self.state_mut().matrix_depth -= 1;
    }

    fn matrix_identity(&self) {}

    fn ortho(&self, left: f32, right: f32, top: f32, bottom: f32, znear: f32, zfar: f32) {
        self.state_mut().ortho = Some([left, right, top, bottom, znear, zfar]);
    }

    fn blend_state_push(&self) {
        let mut s = self.state_mut();
        let blending = s.blending;
        s.blend_saved.push(blending);
        s.blend_depth += 1;
    }

    fn blend_state_pop(&self) {
        let mut s = self.state_mut();
        if let Some(blending) = s.blend_saved.pop() {
            s.blending = blending;
        }
        s.blend_depth -= 1;
    }

    fn reset_blend_state(&self) {
        self.state_mut().blending = true;
    }

    fn cull_mode(&self) -> CullMode {
        self.state().cull
    }

    fn set_cull_mode(&self, mode: CullMode) {
        self.state_mut().cull = mode;
    }

    fn enable_color(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.state_mut().color_mask = [red, green, blue, alpha];
    }

    fn enable_blending(&self, enable: bool) {
        self.state_mut().blending = enable;
    }

    fn enable_depth_test(&self, enable: bool) {
        self.state_mut().depth_test = enable;
    }

    fn enable_stencil_test(&self, enable: bool) {
        self.state_mut().stencil_test = enable;
    }

    fn enable_stencil_write(&self, enable: bool) {
        self.state_mut().stencil_write = enable;
    }

    fn color_mask(&self) -> [bool; 4] {
        self.state().color_mask
    }

    fn depth_test_enabled(&self) -> bool {
        self.state().depth_test
    }

    fn stencil_test_enabled(&self) -> bool {
        self.state().stencil_test
    }

    fn stencil_write_enabled(&self) -> bool {
        self.state().stencil_write
    }

    fn effect_create_from_file(&self, path: &Path) -> Result<u32, String> {
        let mut s = self.state_mut();
        let params = match s.effect_files.get(path) {
            Some(Ok(params)) => params.clone(),
            Some(Err(e)) => return Err(e.clone()),
            None => return Err(format!("cannot open {}", path.display())),
        };
        let id = s.id();
        s.effects.insert(
            id,
            EffectRecord {
                params,
                destroyed: 0,
                looping: false,
            },
        );
        Ok(id)
    }

    fn effect_destroy(&self, effect: u32) {
        if let Some(e) = self.state_mut().effects.get_mut(&effect) {
            e.destroyed += 1;
        }
    }

    fn effect_param_by_name(&self, effect: u32, name: &str) -> Option<u32> {
        let mut s = self.state_mut();
        let known = s
            .effects
            .get(&effect)
            .is_some_and(|e| e.params.iter().any(|p| p == name));
        if !known {
            return None;
        }
        let id = s.id();
        s.params.insert(id, name.to_string());
        Some(id)
    }

    fn effect_set_texture(&self, param: u32, tex: Option<u32>) {
        let mut s = self.state_mut();
        let name = s.params[&param].clone();
        s.param_sets.push((name, ParamValue::Texture(tex)));
    }

    fn effect_set_vec3(&self, param: u32, v: [f32; 3]) {
        let mut s = self.state_mut();
        let name = s.params[&param].clone();
        s.param_sets.push((name, ParamValue::Vec3(v)));
    }

    fn effect_set_vec4(&self, param: u32, v: [f32; 4]) {
        let mut s = self.state_mut();
        let name = s.params[&param].clone();
        s.param_sets.push((name, ParamValue::Vec4(v)));
    }

    fn effect_loop(&self, effect: u32, technique: &str) -> bool {
        let mut s = self.state_mut();
        let Some(e) = s.effects.get_mut(&effect) else {
            return false;
        };
        e.looping = !e.looping;
        let looping = e.looping;
        s.technique = looping.then(|| technique.to_string());
        looping
    }

    fn draw_sprite(&self, tex: Option<u32>, _flip: u32, width: u32, height: u32) {
        let mut s = self.state_mut();
        let record = DrawRecord {
            target: s.render_target,
            texture: tex,
            technique: s.technique.clone(),
            width,
            height,
            depth_test: s.depth_test,
        };
        s.draws.push(record);
    }
}

/// Host frame context driven by tests.
pub(crate) struct MockHost {
    pub gs: MockGraphics,
    pub size: Option<(u32, u32)>,
    pub parent: bool,
    pub default_effect: Option<u32>,
    pub begin_ok: bool,
    pub begins: u32,
    pub ends: u32,
    pub skips: u32,
}

impl MockHost {
    pub fn new(gs: &MockGraphics, width: u32, height: u32) -> Self {
        let default_effect = gs.builtin_effect(&["image"]);
        Self {
            gs: gs.clone(),
            size: Some((width, height)),
            parent: true,
            default_effect: Some(default_effect),
            begin_ok: true,
            begins: 0,
            ends: 0,
            skips: 0,
        }
    }
}

impl FilterHost<MockGraphics> for MockHost {
    fn target_size(&self) -> Option<(u32, u32)> {
        self.size
    }

    fn has_parent(&self) -> bool {
        self.parent
    }

    fn default_effect(&self) -> Option<u32> {
        self.default_effect
    }

    fn process_filter_begin(&mut self) -> bool {
        self.begins += 1;
        self.begin_ok
    }

    fn process_filter_end(&mut self, effect: u32, width: u32, height: u32) {
        self.ends += 1;
        while self.gs.effect_loop(effect, "Draw") {
            self.gs.draw_sprite(None, 0, width, height);
        }
    }

    fn skip(&mut self) {
        self.skips += 1;
    }
}
