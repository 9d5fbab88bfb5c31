use std::ffi::{CStr, CString};
use std::os::raw::c_char;

pub(crate) fn cstr(bytes: &'static [u8]) -> *const c_char {
    debug_assert!(
        bytes.last() == Some(&0),
        "C string must be NUL-terminated"
    );
    bytes.as_ptr().cast()
}

/// Owned C copy of a Rust string. Interior NULs cut the string short.
pub(crate) fn to_cstring(s: &str) -> CString {
    let end = s.find('\0').unwrap_or(s.len());
    CString::new(&s[..end]).unwrap_or_default()
}

/// Lossy Rust copy of a C string owned by libobs. NULL reads as empty.
pub(crate) unsafe fn from_cstr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}
