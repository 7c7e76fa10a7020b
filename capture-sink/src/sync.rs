// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! The endpoint lock.
//!
//! One mutex guards everything an endpoint mutates: negotiated and requested
//! configuration, the in-flight sample buffer and the ingest counters. Every
//! public endpoint call holds it for its whole duration, so at most one
//! delivery or reconfiguration runs at a time and a configuration read never
//! sees a half-written descriptor.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

pub(crate) struct SinkLock<T> {
    name: &'static str,
    inner: Mutex<T>,
}

impl<T> SinkLock<T> {
    pub(crate) fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            inner: Mutex::new(value),
        }
    }

    /// Acquires the lock, blocking the calling thread until it is available.
    ///
    /// A panic while the lock is held poisons the mutex. Consumer panics are
    /// caught before they reach the lock; anything else that unwinds leaves
    /// the guarded state consistent (every field is written whole), so the
    /// poison is cleared instead of failing every later call.
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("{} lock poisoned by a panicking caller, recovering", self.name);
            self.inner.clear_poison();
            poisoned.into_inner()
        })
    }
}
