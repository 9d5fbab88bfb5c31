#![allow(clippy::missing_safety_doc)]

mod constants;
mod filter;
mod graphics;
mod logging;
mod obs_exports;
mod perf;
mod settings;
mod util;

pub use crate::obs_exports::*;
