//! Clock abstraction used to stamp a peer's join time.

/// Source of wall-clock time in whole unix seconds.
pub trait Clock: Send + Sync {
    fn unix_seconds(&self) -> u64;
}

/// The host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn unix_seconds(&self) -> u64 {
        // SystemTime panics on wasm32-unknown-unknown.
        (js_sys::Date::now() / 1000.0).floor() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn unix_seconds(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_seconds(&self) -> u64 {
        self.0
    }
}
