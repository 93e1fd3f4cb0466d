//! Poison-recovering wrappers around `std::sync` primitives.
//!
//! A panic while holding a lock anywhere in the core should not wedge every
//! other thread behind a poisoned mutex — the dealer and player threads run
//! for the lifetime of the process and must keep making progress. Every
//! wrapper here recovers the guard from a poisoned lock instead of
//! propagating the panic, the same trade-off the teacher crate's `sync`
//! module makes for its `no_std` spin-lock fallback.

use std::sync;

/// A [`std::sync::Mutex`] that recovers from poisoning instead of panicking.
pub struct Mutex<T>(sync::Mutex<T>);

impl<T> Mutex<T> {
    /// Creates a new mutex wrapping `value`.
    pub const fn new(value: T) -> Self {
        Self(sync::Mutex::new(value))
    }

    /// Locks the mutex, recovering the inner value if a prior holder
    /// panicked while holding it.
    pub fn lock(&self) -> sync::MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(sync::PoisonError::into_inner)
    }
}

/// A [`std::sync::RwLock`] that recovers from poisoning instead of
/// panicking.
pub struct RwLock<T>(sync::RwLock<T>);

impl<T> RwLock<T> {
    /// Creates a new rwlock wrapping `value`.
    pub const fn new(value: T) -> Self {
        Self(sync::RwLock::new(value))
    }

    /// Acquires a read (shared) guard.
    pub fn read(&self) -> sync::RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(sync::PoisonError::into_inner)
    }

    /// Acquires a write (exclusive) guard.
    pub fn write(&self) -> sync::RwLockWriteGuard<'_, T> {
        self.0
            .write()
            .unwrap_or_else(sync::PoisonError::into_inner)
    }
}
