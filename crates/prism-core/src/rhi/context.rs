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

//! The logging/assertion context handed to every RHI instance.
//!
//! Programming-contract violations (a stale handle, a resource owned by a
//! different RHI, a malformed flag combination, ...) are never reported through
//! `Result` alone: they are surfaced through [`rhi_assert!`](crate::rhi_assert),
//! which logs the failure and, depending on the [`AssertPolicy`], traps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// What happens when an RHI assertion fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssertPolicy {
    /// Log the failure through `log::error!` and keep going.
    #[default]
    Log,
    /// Log the failure, then panic.
    Panic,
}

/// Shared logging and assertion context of an RHI instance.
///
/// A single context may be shared by several RHI instances; the assertion
/// counter is then global to all of them.
#[derive(Debug, Default)]
pub struct RhiContext {
    policy: AssertPolicy,
    assertions: AtomicU64,
    last_assertion: Mutex<Option<String>>,
}

impl RhiContext {
    /// Creates a new context using the given assertion policy.
    pub fn new(policy: AssertPolicy) -> Self {
        Self {
            policy,
            assertions: AtomicU64::new(0),
            last_assertion: Mutex::new(None),
        }
    }

    /// Returns the assertion policy of this context.
    pub fn policy(&self) -> AssertPolicy {
        self.policy
    }

    /// Records a failed assertion. Called by [`rhi_assert!`](crate::rhi_assert).
    pub fn report_assertion(&self, file: &'static str, line: u32, message: fmt::Arguments<'_>) {
        let message = message.to_string();
        log::error!("RHI assertion failed ({file}:{line}): {message}");
        self.assertions.fetch_add(1, Ordering::Relaxed);
        *self
            .last_assertion
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.clone());

        if self.policy == AssertPolicy::Panic {
            panic!("RHI assertion failed ({file}:{line}): {message}");
        }
    }

    /// The number of assertions that fired since creation or the last reset.
    pub fn assertion_count(&self) -> u64 {
        self.assertions.load(Ordering::Relaxed)
    }

    /// The message of the most recent failed assertion, if any.
    pub fn last_assertion(&self) -> Option<String> {
        self.last_assertion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Resets the assertion counter and forgets the last message.
    pub fn reset_assertions(&self) {
        self.assertions.store(0, Ordering::Relaxed);
        *self
            .last_assertion
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Checks an RHI contract and reports a violation to an [`RhiContext`].
///
/// Evaluates to the value of the condition so the caller can refuse to
/// proceed. Reporting only happens in builds with `debug_assertions`; the
/// condition is evaluated in every build.
///
/// ```
/// use prism_core::rhi::RhiContext;
///
/// let context = RhiContext::default();
/// let table_index = 3;
/// if !prism_core::rhi_assert!(context, table_index < 2, "table index {table_index} out of range") {
///     // skip the operation
/// }
/// # #[cfg(debug_assertions)]
/// assert_eq!(context.assertion_count(), 1);
/// ```
#[macro_export]
macro_rules! rhi_assert {
    ($context:expr, $condition:expr, $($arg:tt)+) => {{
        let condition: bool = $condition;
        if !condition && cfg!(debug_assertions) {
            $context.report_assertion(file!(), line!(), format_args!($($arg)+));
        }
        condition
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passing_assertion_is_silent() {
        let context = RhiContext::new(AssertPolicy::Log);
        assert!(crate::rhi_assert!(context, 1 + 1 == 2, "math is broken"));
        assert_eq!(context.assertion_count(), 0);
        assert!(context.last_assertion().is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    fn failing_assertion_is_counted_under_log_policy() {
        let context = RhiContext::new(AssertPolicy::Log);
        let passed = crate::rhi_assert!(context, false, "index {} out of range", 7);
        assert!(!passed);
        assert_eq!(context.assertion_count(), 1);
        assert_eq!(
            context.last_assertion().as_deref(),
            Some("index 7 out of range")
        );

        context.reset_assertions();
        assert_eq!(context.assertion_count(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "RHI assertion failed")]
    fn failing_assertion_panics_under_panic_policy() {
        let context = RhiContext::new(AssertPolicy::Panic);
        crate::rhi_assert!(context, false, "trap");
    }
}
