//! Playback status snapshot

use core_runtime::config::DEFAULT_INITIAL_VOLUME;
use serde::{Deserialize, Serialize};

/// Snapshot of the controller's observable state.
///
/// Cheap to copy; distributed through a `watch` channel so reading it never
/// contends with in-flight playback operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// Whether the active preview is audibly playing.
    pub is_playing: bool,
    /// Volume step in `[0, 10]`.
    pub volume: u8,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: DEFAULT_INITIAL_VOLUME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stopped_at_mid_volume() {
        let status = PlayerStatus::default();
        assert!(!status.is_playing);
        assert_eq!(status.volume, 5);
    }
}
