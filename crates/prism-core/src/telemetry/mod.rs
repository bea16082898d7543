// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CPU-side profiling hooks.
//!
//! GPU-side markers are recorded into command buffers (see
//! [`CommandBuffer::debug_event_scope`](crate::rhi::CommandBuffer::debug_event_scope)).
//! This module covers the CPU half: named samples measured by an RAII guard
//! and reported to a [`CpuProfiler`].

use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Receives CPU samples.
pub trait CpuProfiler: Send + Sync + Debug {
    /// Called when a sample starts.
    fn begin_sample(&self, name: &str);

    /// Called when a sample ends, with its duration.
    fn end_sample(&self, name: &str, elapsed: Duration);
}

/// Measures the time between its creation and its drop.
///
/// ```
/// use prism_core::telemetry::{LogCpuProfiler, ScopedCpuSample};
///
/// let profiler = LogCpuProfiler::default();
/// {
///     let _sample = ScopedCpuSample::new(&profiler, "fill command buffer");
/// }
/// assert_eq!(profiler.samples().len(), 1);
/// ```
#[must_use = "the sample ends when the guard is dropped"]
pub struct ScopedCpuSample<'a> {
    profiler: &'a dyn CpuProfiler,
    name: Cow<'static, str>,
    start: Instant,
}

impl<'a> ScopedCpuSample<'a> {
    /// Starts a sample.
    pub fn new(profiler: &'a dyn CpuProfiler, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        profiler.begin_sample(&name);
        Self {
            profiler,
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedCpuSample<'_> {
    fn drop(&mut self) {
        self.profiler.end_sample(&self.name, self.start.elapsed());
    }
}

/// A profiler that reports every finished sample through `log::debug!` and
/// keeps the samples for inspection.
#[derive(Debug, Default)]
pub struct LogCpuProfiler {
    samples: Mutex<Vec<(String, Duration)>>,
}

impl LogCpuProfiler {
    /// The finished samples, oldest first.
    pub fn samples(&self) -> Vec<(String, Duration)> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_default()
    }

    /// Forgets the finished samples.
    pub fn clear(&self) {
        if let Ok(mut samples) = self.samples.lock() {
            samples.clear();
        }
    }
}

impl CpuProfiler for LogCpuProfiler {
    fn begin_sample(&self, name: &str) {
        log::trace!("CPU sample '{name}' started");
    }

    fn end_sample(&self, name: &str, elapsed: Duration) {
        log::debug!("CPU sample '{name}' took {:.3} ms", elapsed.as_secs_f64() * 1000.0);
        if let Ok(mut samples) = self.samples.lock() {
            samples.push((name.to_owned(), elapsed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_samples_end_innermost_first() {
        let profiler = LogCpuProfiler::default();
        {
            let _outer = ScopedCpuSample::new(&profiler, "frame");
            {
                let _inner = ScopedCpuSample::new(&profiler, String::from("dispatch"));
            }
        }
        let names: Vec<String> = profiler.samples().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["dispatch", "frame"]);

        profiler.clear();
        assert!(profiler.samples().is_empty());
    }
}
