use colorgrade_core::params::{DEFAULTS, GROUPS, SLIDER_STEP};
use colorgrade_core::Settings;
use obs_sys as obs;

use crate::util::to_cstring;

/// Borrowed view of an `obs_data_t` settings object.
pub(crate) struct ObsData(*mut obs::obs_data_t);

impl ObsData {
    pub(crate) unsafe fn new(data: *mut obs::obs_data_t) -> Self {
        Self(data)
    }
}

impl Settings for ObsData {
    fn get_double(&self, key: &str) -> f64 {
        if self.0.is_null() {
            return 0.0;
        }
        let key = to_cstring(key);
        unsafe { obs::obs_data_get_double(self.0, key.as_ptr()) }
    }
}

pub(crate) unsafe fn set_defaults(settings: *mut obs::obs_data_t) {
    if settings.is_null() {
        return;
    }

    for (key, value) in DEFAULTS {
        let key = to_cstring(key);
        obs::obs_data_set_default_double(settings, key.as_ptr(), *value);
    }
}

pub(crate) unsafe fn get_properties() -> *mut obs::obs_properties_t {
    let props = obs::obs_properties_create();
    if props.is_null() {
        return props;
    }

    for group in GROUPS {
        let group_props = obs::obs_properties_create();
        if group_props.is_null() {
            continue;
        }

        for slider in group.sliders {
            let key = to_cstring(slider.key);
            let label = to_cstring(slider.label);
            obs::obs_properties_add_float_slider(
                group_props,
                key.as_ptr(),
                label.as_ptr(),
                slider.min,
                slider.max,
                SLIDER_STEP,
            );
        }

        let id = to_cstring(group.id);
        let label = to_cstring(group.label);
        obs::obs_properties_add_group(
            props,
            id.as_ptr(),
            label.as_ptr(),
            obs::obs_group_type_OBS_GROUP_NORMAL,
            group_props,
        );
    }

    props
}
