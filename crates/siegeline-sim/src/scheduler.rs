//! Priority-ordered system registry with per-system fault isolation.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::world::World;

/// Failure surfaced by a system. A failing system is logged and skipped for
/// the tick; it never aborts the remaining systems.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SystemError(pub String);

pub type SystemFn = Box<dyn FnMut(&mut World) -> Result<(), SystemError>>;

struct SystemSlot {
    name: &'static str,
    priority: i32,
    enabled: bool,
    func: SystemFn,
}

/// Holds registered systems and runs them in ascending priority order every
/// tick. Sorting happens lazily on the first run after any registration;
/// equal priorities keep registration order (stable sort).
pub struct Scheduler {
    systems: Vec<SystemSlot>,
    sorted: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            sorted: true,
        }
    }

    pub fn register(&mut self, name: &'static str, priority: i32, func: SystemFn) {
        self.systems.push(SystemSlot {
            name,
            priority,
            enabled: true,
            func,
        });
        self.sorted = false;
    }

    /// Toggle a system without unregistering it. Returns false when no
    /// system has that name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let mut found = false;
        for slot in &mut self.systems {
            if slot.name == name {
                slot.enabled = enabled;
                found = true;
            }
        }
        found
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.systems
            .iter()
            .any(|slot| slot.name == name && slot.enabled)
    }

    /// Execution order after sorting, for diagnostics and tests.
    pub fn order(&self) -> Vec<&'static str> {
        let mut slots: Vec<(&'static str, i32)> = self
            .systems
            .iter()
            .map(|s| (s.name, s.priority))
            .collect();
        slots.sort_by_key(|&(_, p)| p);
        slots.into_iter().map(|(n, _)| n).collect()
    }

    /// Run every enabled system in priority order. A system that returns an
    /// error or panics is logged with its name; the rest of the tick still
    /// runs.
    pub fn run(&mut self, world: &mut World) {
        if !self.sorted {
            self.systems.sort_by_key(|slot| slot.priority);
            self.sorted = true;
        }

        for slot in &mut self.systems {
            if !slot.enabled {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (slot.func)(world)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    log::error!("system '{}' failed: {err}", slot.name);
                }
                Err(payload) => {
                    let msg = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic".to_string());
                    log::error!("system '{}' panicked: {msg}", slot.name);
                }
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
