//! Optional per-pass render timings.
//!
//! Compiled in with the `perf` feature and switched on at runtime with
//! `COLORGRADE_PERF=1`. Each instance logs one summary line per second.

use std::time::Instant;

use colorgrade_core::PassTimings;

#[cfg(feature = "perf")]
mod imp {
    use std::sync::OnceLock;
    use std::time::{Duration, Instant};

    use colorgrade_core::PassTimings;

    const REPORT_INTERVAL: Duration = Duration::from_secs(1);

    pub(super) fn enabled() -> bool {
        static ENABLED: OnceLock<bool> = OnceLock::new();
        *ENABLED.get_or_init(|| {
            std::env::var("COLORGRADE_PERF").is_ok_and(|v| {
                let v = v.trim();
                !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
            })
        })
    }

    #[derive(Clone, Copy, Default)]
    struct Window {
        samples: u32,
        total: Duration,
        worst: Duration,
    }

    impl Window {
        fn add(&mut self, d: Duration) {
            self.samples = self.samples.saturating_add(1);
            self.total = self.total.saturating_add(d);
            self.worst = self.worst.max(d);
        }

        fn mean_ms(&self) -> f64 {
            if self.samples == 0 {
                return 0.0;
            }
            self.total.as_secs_f64() * 1000.0 / f64::from(self.samples)
        }

        fn worst_ms(&self) -> f64 {
            self.worst.as_secs_f64() * 1000.0
        }
    }

    // frame, source, grade, composite
    pub(super) struct Stats {
        since: Instant,
        stages: [Window; 4],
    }

    impl Stats {
        pub(super) fn new() -> Self {
            Self {
                since: Instant::now(),
                stages: [Window::default(); 4],
            }
        }

        pub(super) fn add(&mut self, frame: Duration, passes: PassTimings) {
            self.stages[0].add(frame);
            for (window, pass) in self.stages[1..]
                .iter_mut()
                .zip([passes.source, passes.grade, passes.composite])
            {
                if let Some(d) = pass {
                    window.add(d);
                }
            }
        }

        pub(super) fn report_if_due(&mut self, name: &str) {
            let elapsed = self.since.elapsed();
            if elapsed < REPORT_INTERVAL {
                return;
            }

            let [frame, source, grade, composite] = self.stages;
            let fps = f64::from(frame.samples) / elapsed.as_secs_f64();
            tracing::info!(
                filter = name,
                "fps {fps:.1} render {:.3}ms (worst {:.3}) source {:.3}ms x{} grade {:.3}ms x{} composite {:.3}ms",
                frame.mean_ms(),
                frame.worst_ms(),
                source.mean_ms(),
                source.samples,
                grade.mean_ms(),
                grade.samples,
                composite.mean_ms(),
            );

            *self = Self::new();
        }
    }
}

/// Per-instance render timings.
pub(crate) struct RenderPerf {
    #[cfg(feature = "perf")]
    stats: Option<imp::Stats>,
}

impl RenderPerf {
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(feature = "perf")]
            stats: imp::enabled().then(imp::Stats::new),
        }
    }

    /// Start of a frame, or `None` when timing is off.
    pub(crate) fn start(&self) -> Option<Instant> {
        #[cfg(feature = "perf")]
        {
            self.stats.as_ref().map(|_| Instant::now())
        }

        #[cfg(not(feature = "perf"))]
        {
            None
        }
    }

    pub(crate) fn record_frame(&mut self, start: Option<Instant>, passes: PassTimings, name: &str) {
        #[cfg(feature = "perf")]
        {
            if let (Some(stats), Some(t0)) = (self.stats.as_mut(), start) {
                stats.add(t0.elapsed(), passes);
                stats.report_if_due(name);
            }
        }

        #[cfg(not(feature = "perf"))]
        let _ = (start, passes, name);
    }
}
