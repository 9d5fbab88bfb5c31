//! Routes `tracing` events into the OBS log.

use std::io;

use obs_sys as obs;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::constants::LOG_FORMAT;
use crate::util::{cstr, to_cstring};

const FILTER_ENV: &str = "COLORGRADE_LOG";

pub(crate) fn init() {
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(BlogMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("a global tracing subscriber is already installed");
    }
}

fn blog_level(level: &Level) -> i32 {
    let level = match *level {
        Level::ERROR => obs::LOG_ERROR,
        Level::WARN => obs::LOG_WARNING,
        Level::INFO => obs::LOG_INFO,
        Level::DEBUG | Level::TRACE => obs::LOG_DEBUG,
    };
    level as i32
}

struct BlogMakeWriter;

impl<'a> MakeWriter<'a> for BlogMakeWriter {
    type Writer = BlogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BlogWriter::new(obs::LOG_INFO as i32)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        BlogWriter::new(blog_level(meta.level()))
    }
}

/// Buffers one formatted event and hands it to `blog` on drop.
struct BlogWriter {
    level: i32,
    buf: Vec<u8>,
}

impl BlogWriter {
    fn new(level: i32) -> Self {
        Self {
            level,
            buf: Vec::with_capacity(128),
        }
    }

    fn message(&self) -> String {
        String::from_utf8_lossy(&self.buf).trim_end().to_owned()
    }
}

impl io::Write for BlogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for BlogWriter {
    fn drop(&mut self) {
        let msg = self.message();
        if msg.is_empty() {
            return;
        }
        let msg = to_cstring(&msg);
        unsafe {
            obs::blog(self.level, cstr(LOG_FORMAT), msg.as_ptr());
        }
    }
}
