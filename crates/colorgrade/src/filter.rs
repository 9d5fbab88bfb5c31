use std::any::Any;
use std::ffi::c_void;
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use colorgrade_core::color_grade::EFFECT_FILE;
use colorgrade_core::{
    create_instance, ColorGradeFilter, FailureLog, FilterContext, FilterHost, VideoFilter,
};
use obs_sys as obs;

use crate::constants::*;
use crate::graphics::{GraphicsContext, ObsGraphics};
use crate::perf::RenderPerf;
use crate::settings::{self, ObsData};
use crate::util::{cstr, from_cstr, to_cstring};

type ColorGrade = ColorGradeFilter<ObsGraphics>;

/// Host-side state wrapped around each filter instance.
struct Instance<F> {
    source: *mut obs::obs_source_t,
    name: String,
    filter: F,
    perf: RenderPerf,
    failures: FailureLog,
}

struct ObsFilterHost {
    source: *mut obs::obs_source_t,
}

impl FilterHost<ObsGraphics> for ObsFilterHost {
    fn target_size(&self) -> Option<(u32, u32)> {
        unsafe {
            let target = obs::obs_filter_get_target(self.source);
            if target.is_null() {
                return None;
            }
            Some((
                obs::obs_source_get_base_width(target),
                obs::obs_source_get_base_height(target),
            ))
        }
    }

    fn has_parent(&self) -> bool {
        unsafe { !obs::obs_filter_get_parent(self.source).is_null() }
    }

    fn default_effect(&self) -> Option<*mut obs::gs_effect_t> {
        let effect = unsafe { obs::obs_get_base_effect(obs::obs_base_effect_OBS_EFFECT_DEFAULT) };
        (!effect.is_null()).then_some(effect)
    }

    fn process_filter_begin(&mut self) -> bool {
        unsafe {
            obs::obs_source_process_filter_begin(
                self.source,
                obs::gs_color_format_GS_RGBA,
                obs::obs_allow_direct_render_OBS_ALLOW_DIRECT_RENDERING,
            )
        }
    }

    fn process_filter_end(&mut self, effect: *mut obs::gs_effect_t, width: u32, height: u32) {
        unsafe { obs::obs_source_process_filter_end(self.source, effect, width, height) }
    }

    fn skip(&mut self) {
        unsafe { obs::obs_source_skip_video_filter(self.source) }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Runs a host callback, turning a panic into a log line and `fallback`.
fn guarded<R>(name: &str, callback: &str, fallback: R, f: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(r) => r,
        Err(payload) => {
            tracing::error!(
                filter = name,
                "{callback} panicked: {}",
                panic_message(payload.as_ref())
            );
            fallback
        }
    }
}

unsafe fn source_name(source: *mut obs::obs_source_t) -> String {
    if source.is_null() {
        return String::new();
    }
    from_cstr(obs::obs_source_get_name(source))
}

unsafe fn module_file(file: &str) -> Option<PathBuf> {
    // obs_module_file is a header macro over obs_find_module_file.
    let module = crate::obs_exports::obs_current_module();
    if module.is_null() {
        tracing::warn!("obs_current_module returned NULL");
        return None;
    }

    let file = to_cstring(file);
    let path = obs::obs_find_module_file(module, file.as_ptr());
    if path.is_null() {
        return None;
    }
    let resolved = PathBuf::from(from_cstr(path));
    obs::bfree(path.cast());
    Some(resolved)
}

unsafe fn instance<'a, F>(data: *mut c_void) -> Option<&'a mut Instance<F>> {
    data.cast::<Instance<F>>().as_mut()
}

pub(crate) unsafe fn register_sources() {
    let mut info: obs::obs_source_info = std::mem::zeroed();
    info.id = cstr(FILTER_ID);
    info.type_ = obs::obs_source_type_OBS_SOURCE_TYPE_FILTER;
    info.output_flags = obs::OBS_SOURCE_VIDEO;

    info.get_name = Some(color_grade_get_name);
    info.get_defaults = Some(color_grade_get_defaults);
    info.get_properties = Some(color_grade_get_properties);
    info.create = Some(filter_create::<ColorGrade>);
    info.destroy = Some(filter_destroy::<ColorGrade>);
    info.update = Some(filter_update::<ColorGrade>);
    info.activate = Some(filter_activate::<ColorGrade>);
    info.deactivate = Some(filter_deactivate::<ColorGrade>);
    info.video_tick = Some(filter_video_tick::<ColorGrade>);
    info.video_render = Some(filter_video_render::<ColorGrade>);
    info.get_width = Some(filter_get_width::<ColorGrade>);
    info.get_height = Some(filter_get_height::<ColorGrade>);

    obs::obs_register_source_s(
        &info as *const obs::obs_source_info,
        std::mem::size_of::<obs::obs_source_info>() as obs::size_t,
    );
}

unsafe extern "C" fn color_grade_get_name(_type_data: *mut c_void) -> *const c_char {
    FILTER_DISPLAY_NAME.as_ptr().cast()
}

unsafe extern "C" fn color_grade_get_defaults(settings_data: *mut obs::obs_data_t) {
    guarded("", "get_defaults", (), || settings::set_defaults(settings_data));
}

unsafe extern "C" fn color_grade_get_properties(_data: *mut c_void) -> *mut obs::obs_properties_t {
    guarded("", "get_properties", std::ptr::null_mut(), || {
        settings::get_properties()
    })
}

unsafe extern "C" fn filter_create<F: VideoFilter<ObsGraphics>>(
    settings_data: *mut obs::obs_data_t,
    source: *mut obs::obs_source_t,
) -> *mut c_void {
    let name = source_name(source);
    guarded(&name, "create", std::ptr::null_mut(), || {
        let context = FilterContext {
            name: name.clone(),
            effect_path: module_file(EFFECT_FILE),
        };
        let settings = ObsData::new(settings_data);

        let created = {
            let _gfx = GraphicsContext::enter();
            create_instance::<_, F>(&ObsGraphics, &context, &settings)
        };
        let Some(filter) = created else {
            return std::ptr::null_mut();
        };
        let instance = Box::new(Instance {
            source,
            name: name.clone(),
            filter,
            perf: RenderPerf::new(),
            failures: FailureLog::default(),
        });
        Box::into_raw(instance).cast()
    })
}

unsafe extern "C" fn filter_destroy<F: VideoFilter<ObsGraphics>>(data: *mut c_void) {
    if data.is_null() {
        return;
    }
    let instance = Box::from_raw(data.cast::<Instance<F>>());
    let name = instance.name.clone();
    guarded(&name, "destroy", (), || {
        let _gfx = GraphicsContext::enter();
        drop(instance);
    });
}

unsafe extern "C" fn filter_update<F: VideoFilter<ObsGraphics>>(
    data: *mut c_void,
    settings_data: *mut obs::obs_data_t,
) {
    let Some(instance) = instance::<F>(data) else {
        return;
    };
    instance.name = source_name(instance.source);
    guarded(&instance.name, "update", (), || {
        instance.filter.update(&ObsData::new(settings_data));
    });
}

unsafe extern "C" fn filter_activate<F: VideoFilter<ObsGraphics>>(data: *mut c_void) {
    let Some(instance) = instance::<F>(data) else {
        return;
    };
    guarded(&instance.name, "activate", (), || instance.filter.activate());
}

unsafe extern "C" fn filter_deactivate<F: VideoFilter<ObsGraphics>>(data: *mut c_void) {
    let Some(instance) = instance::<F>(data) else {
        return;
    };
    guarded(&instance.name, "deactivate", (), || instance.filter.deactivate());
}

unsafe extern "C" fn filter_video_tick<F: VideoFilter<ObsGraphics>>(
    data: *mut c_void,
    seconds: f32,
) {
    let Some(instance) = instance::<F>(data) else {
        return;
    };
    guarded(&instance.name, "video_tick", (), || instance.filter.video_tick(seconds));
}

unsafe extern "C" fn filter_video_render<F: VideoFilter<ObsGraphics>>(
    data: *mut c_void,
    _effect: *mut obs::gs_effect_t,
) {
    let Some(instance) = instance::<F>(data) else {
        return;
    };
    let source = instance.source;
    let name = instance.name.clone();

    let rendered = guarded(&name, "video_render", false, || {
        let t_frame = instance.perf.start();
        let mut host = ObsFilterHost { source };
        let result = instance.filter.video_render(&mut host);
        instance
            .perf
            .record_frame(t_frame, instance.filter.pass_timings(), &instance.name);

        match result {
            Ok(_) => {
                instance.failures.succeeded(&instance.name);
                true
            }
            Err(e) => {
                instance.failures.failed(&instance.name, &e);
                false
            }
        }
    });

    if !rendered {
        obs::obs_source_skip_video_filter(source);
    }
}

unsafe extern "C" fn filter_get_width<F: VideoFilter<ObsGraphics>>(data: *mut c_void) -> u32 {
    let Some(instance) = instance::<F>(data) else {
        return 0;
    };
    guarded(&instance.name, "get_width", 0, || instance.filter.width())
}

unsafe extern "C" fn filter_get_height<F: VideoFilter<ObsGraphics>>(data: *mut c_void) -> u32 {
    let Some(instance) = instance::<F>(data) else {
        return 0;
    };
    guarded(&instance.name, "get_height", 0, || instance.filter.height())
}
