pub(crate) static MODULE_NAME: &[u8] = b"ColorGrade\0";
pub(crate) static MODULE_DESCRIPTION: &[u8] =
    b"ColorGrade (Rust) - lift, gamma, gain, offset, tint and HSL correction filter\0";
pub(crate) static MODULE_AUTHOR: &[u8] = b"ColorGrade contributors\0";
pub(crate) const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) static FILTER_ID: &[u8] = b"colorgrade_filter\0";
pub(crate) static FILTER_DISPLAY_NAME: &[u8] = b"Color Grade\0";

pub(crate) static LOG_FORMAT: &[u8] = b"[ColorGrade] %s\0";
