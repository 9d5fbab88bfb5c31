//! Symbols libobs looks up when it loads the module.

use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use obs_sys as obs;

use crate::constants::{MODULE_AUTHOR, MODULE_DESCRIPTION, MODULE_NAME, MODULE_VERSION};

static CURRENT_MODULE: AtomicPtr<obs::obs_module_t> = AtomicPtr::new(ptr::null_mut());

macro_rules! module_string {
    ($($export:ident => $value:expr;)*) => {
        $(
            #[no_mangle]
            pub extern "C" fn $export() -> *const c_char {
                $value.as_ptr().cast()
            }
        )*
    };
}

module_string! {
    obs_module_name => MODULE_NAME;
    obs_module_description => MODULE_DESCRIPTION;
    obs_module_author => MODULE_AUTHOR;
}

#[no_mangle]
pub extern "C" fn obs_module_ver() -> u32 {
    let api = [
        obs::LIBOBS_API_MAJOR_VER,
        obs::LIBOBS_API_MINOR_VER,
        obs::LIBOBS_API_PATCH_VER,
    ];
    (api[0] << 24) | (api[1] << 16) | api[2]
}

#[no_mangle]
pub extern "C" fn obs_module_set_pointer(module: *mut obs::obs_module_t) {
    CURRENT_MODULE.store(module, Ordering::Release);
}

#[no_mangle]
pub extern "C" fn obs_current_module() -> *mut obs::obs_module_t {
    CURRENT_MODULE.load(Ordering::Acquire)
}

#[no_mangle]
pub unsafe extern "C" fn obs_module_load() -> bool {
    crate::logging::init();
    crate::filter::register_sources();
    tracing::info!(version = MODULE_VERSION, "loaded");
    true
}

#[no_mangle]
pub extern "C" fn obs_module_unload() {
    tracing::info!("unloaded");
}
