//! S2c module registry: a singly-linked, append-at-head list of
//! [`LogModule`]s, walked linearly by [`set_level`].

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, Ordering};

use super::LogLevel;
use crate::config;

/// A translation unit's log module: a name and a mutable threshold level.
/// Intended to live in `static` storage, created with [`LogModule::new`]
/// and wired up with [`LogModule::register`] once during startup.
pub struct LogModule {
    name: &'static str,
    level: AtomicU8,
    next: UnsafeCell<*const LogModule>,
}

// SAFETY:
// - `LogModule`s live in `static` storage and are registered/read from
//   both interrupt and cooperative contexts.
// - `next` is written only by `register`, itself serialized by the
//   critical section, and read only while holding it; `level` is a single
//   atomic store/load, a benign race per the specification.
unsafe impl Sync for LogModule {}

impl LogModule {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            level: AtomicU8::new(config::DEFAULT_LOG_LEVEL as u8),
            next: UnsafeCell::new(core::ptr::null()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Prepends this module to the process-wide registry. Must be called
    /// exactly once per module, during early program startup, before any
    /// concurrent log call can observe it missing.
    pub fn register(&'static self) {
        critical_section::with(|_| {
            // SAFETY: inside critical section.
            unsafe {
                *self.next.get() = *HEAD.0.get();
                *HEAD.0.get() = self as *const LogModule;
            }
        });
    }

    unsafe fn next(&self) -> *const LogModule {
        *self.next.get()
    }
}

struct RegistryHead(UnsafeCell<*const LogModule>);

// SAFETY: mutated only under the critical section, see `LogModule::register`.
unsafe impl Sync for RegistryHead {}

static HEAD: RegistryHead = RegistryHead(UnsafeCell::new(core::ptr::null()));

/// Scans the registry linearly by name and updates the first match's level
/// in place. No-op if no module has that name.
pub fn set_level(module_name: &str, level: LogLevel) {
    critical_section::with(|_| {
        // SAFETY: inside critical section; list is stable once linked.
        unsafe {
            let mut node = *HEAD.0.get();
            while let Some(module) = (node as *const LogModule).as_ref() {
                if module.name == module_name {
                    module.set_level(level);
                    return;
                }
                node = module.next();
            }
        }
    });
}
