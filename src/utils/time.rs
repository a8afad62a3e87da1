//! Time utilities: unix timestamps, subtitle timestamps, interruptible sleep.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const SLEEP_SLICE: Duration = Duration::from_millis(250);

pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// `HH:MM:SS,mmm` as used by SubRip files.
pub fn format_srt_timestamp(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60,
        ms
    )
}

/// `MM:SS` for song positions.
pub fn format_mm_ss(secs: f64) -> String {
    let secs = secs.max(0.0) as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Sleep for `total`, waking early when `stop` is set. Returns false if stopped.
pub fn sleep_unless_stopped(total: Duration, stop: &AtomicBool) -> bool {
    let mut remaining = total;
    while !remaining.is_zero() {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        let slice = remaining.min(SLEEP_SLICE);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
    !stop.load(Ordering::SeqCst)
}
