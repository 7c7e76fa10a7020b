// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Run state of the host graph.
//!
//! The graph that owns a sink drives it through Stopped -> Running -> Stopped,
//! passing through Transitioning while it pauses or prerolls. The sink never
//! changes this state itself; callers pass the current value into every
//! operation that depends on it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Externally driven lifecycle of a sink endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No samples flow; configuration may change.
    #[default]
    Stopped,
    /// Pausing, prerolling or otherwise between Stopped and Running.
    Transitioning,
    /// Samples are flowing.
    Running,
}

impl RunState {
    /// Configuration changes are only permitted while stopped.
    pub fn allows_reconfiguration(self) -> bool {
        self == RunState::Stopped
    }

    /// Samples are accepted in every state except Stopped.
    pub fn accepts_samples(self) -> bool {
        self != RunState::Stopped
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Stopped => "stopped",
            RunState::Transitioning => "transitioning",
            RunState::Running => "running",
        })
    }
}
