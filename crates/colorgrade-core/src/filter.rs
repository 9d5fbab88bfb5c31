//! Lifecycle interface between a host video-filter slot and a filter instance.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::{GraphicsResult, PassError};
use crate::gs::Graphics;
use crate::settings::Settings;

/// Per-frame view of the host, valid for one `video_render` call.
pub trait FilterHost<G: Graphics> {
    /// Base size of the filter's target source, `None` if there is no target.
    fn target_size(&self) -> Option<(u32, u32)>;

    fn has_parent(&self) -> bool;

    /// The host's pass-through effect.
    fn default_effect(&self) -> Option<G::Effect>;

    /// Prepares the upstream source for drawing. Returns false if it can't.
    fn process_filter_begin(&mut self) -> bool;

    /// Draws the upstream source with `effect` at `width` x `height`.
    fn process_filter_end(&mut self, effect: G::Effect, width: u32, height: u32);

    /// Passes the upstream source through unfiltered for this frame.
    fn skip(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Skipped,
}

/// Wall time spent in each pass of the last render. `None` for passes that
/// did not run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTimings {
    pub source: Option<Duration>,
    pub grade: Option<Duration>,
    pub composite: Option<Duration>,
}

/// What the host knows about an instance at creation time.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    /// The source name given by the user, used in log lines.
    pub name: String,
    /// Resolved path of the filter's effect file, if the host found one.
    pub effect_path: Option<PathBuf>,
}

pub trait VideoFilter<G: Graphics>: Sized {
    fn create(gs: &G, context: &FilterContext, settings: &dyn Settings) -> GraphicsResult<Self>;

    fn update(&mut self, settings: &dyn Settings);

    fn activate(&mut self) {}

    fn deactivate(&mut self) {}

    fn video_tick(&mut self, _seconds: f32) {}

    fn video_render(&mut self, host: &mut dyn FilterHost<G>) -> Result<RenderOutcome, PassError>;

    /// Output width. 0 means "same as the target".
    fn width(&self) -> u32 {
        0
    }

    fn height(&self) -> u32 {
        0
    }

    fn pass_timings(&self) -> PassTimings {
        PassTimings::default()
    }
}

/// Creates an instance for the host. A failure is logged once under the
/// instance name and yields `None`.
pub fn create_instance<G, F>(gs: &G, context: &FilterContext, settings: &dyn Settings) -> Option<F>
where
    G: Graphics,
    F: VideoFilter<G>,
{
    match F::create(gs, context, settings) {
        Ok(filter) => {
            tracing::info!(filter = %context.name, "created");
            Some(filter)
        }
        Err(e) => {
            tracing::error!(filter = %context.name, error = %e, "failed to create filter");
            None
        }
    }
}

/// Logs per-frame render failures for one instance.
///
/// The first failure is logged straight away. Repeats are folded into one line
/// per `interval` carrying the number of frames dropped since the last line.
#[derive(Debug)]
pub struct FailureLog {
    interval: Duration,
    failing: bool,
    last_report: Option<Instant>,
    dropped: u64,
}

impl Default for FailureLog {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FailureLog {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            failing: false,
            last_report: None,
            dropped: 0,
        }
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }

    pub fn failed(&mut self, name: &str, err: &PassError) {
        self.failing = true;
        self.dropped += 1;

        let now = Instant::now();
        if self
            .last_report
            .is_some_and(|t| now.duration_since(t) < self.interval)
        {
            return;
        }

        tracing::error!(
            filter = name,
            pass = err.pass,
            error = %err.source,
            dropped = self.dropped,
            "render failed, frame skipped"
        );
        self.last_report = Some(now);
        self.dropped = 0;
    }

    pub fn succeeded(&mut self, name: &str) {
        if !self.failing {
            return;
        }
        tracing::info!(filter = name, "rendering recovered");
        *self = Self::new(self.interval);
    }
}
