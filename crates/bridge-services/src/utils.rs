use std::time::Duration;

/// Blocking sleep, emulating the host's `sleep(ms)`.
///
/// The emulated host is single-threaded and blocking by design, so this
/// blocks the calling thread outright.
pub fn sleep(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
