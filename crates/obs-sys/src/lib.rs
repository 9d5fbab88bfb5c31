//! Raw libobs bindings, generated at build time from the OBS headers.

#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(non_upper_case_globals)]
#![allow(clippy::all)]

pub use libc::{c_char, c_double, c_float, c_int, c_long, c_uint, c_void};

pub type size_t = libc::size_t;

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
