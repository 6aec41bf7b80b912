//! Locally minted identifiers for entities the server has not confirmed yet.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::constants::TEMP_ID_FLOOR;

/// Whether an id was minted on the client rather than assigned by the server.
pub fn is_temporary(id: i64) -> bool {
    id > TEMP_ID_FLOOR
}

/// Clock-derived, strictly increasing temporary ids.
///
/// Values are microseconds since the epoch, bumped past the previous value
/// when the clock has not advanced, and never at or below [`TEMP_ID_FLOOR`].
#[derive(Debug, Default)]
pub struct TempIds {
    last: AtomicI64,
}

impl TempIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_micros().max(TEMP_ID_FLOOR + 1);
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self
                .last
                .compare_exchange_weak(previous, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(current) => previous = current,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_temporary() {
        let ids = TempIds::new();
        let minted: Vec<i64> = (0..1000).map(|_| ids.next()).collect();
        assert!(minted.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(minted.iter().all(|&id| is_temporary(id)));
    }

    #[test]
    fn server_ids_are_never_temporary() {
        assert!(!is_temporary(1));
        assert!(!is_temporary(i64::from(i32::MAX)));
    }
}
