use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A single recorded take, already downsampled by the engine for display.
/// Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioClip {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Zero-padded track label for a clip's position in the session ("00", "01", ...).
pub fn clip_label(index: usize) -> String {
    format!("{:02}", index)
}

/// Ordered, append-only collection of recorded clips. Insertion order is
/// recording order; the index doubles as the clip's display identity.
///
/// Cloning the store clones a handle to the same underlying collection.
#[derive(Debug, Clone)]
pub struct ClipStore {
    clips: Arc<RwLock<Vec<AudioClip>>>,
}

impl ClipStore {
    pub fn new() -> Self {
        Self {
            clips: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append a clip to the end of the collection. The transport's
    /// recording-completion handler is the only caller.
    pub fn push(&self, clip: AudioClip) {
        self.clips.write().push(clip);
    }

    /// Ordered snapshot of all clips for rendering.
    pub fn snapshot(&self) -> Vec<AudioClip> {
        self.clips.read().clone()
    }

    pub fn len(&self) -> usize {
        self.clips.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.read().is_empty()
    }
}

impl Default for ClipStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_empty() {
        let store = ClipStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_push_preserves_order() {
        let store = ClipStore::new();
        store.push(AudioClip::new(vec![0.1]));
        store.push(AudioClip::new(vec![0.2]));
        store.push(AudioClip::new(vec![0.3]));

        let clips = store.snapshot();
        assert_eq!(clips.len(), 3);
        assert_eq!(clips[0].samples, vec![0.1]);
        assert_eq!(clips[1].samples, vec![0.2]);
        assert_eq!(clips[2].samples, vec![0.3]);
    }

    #[test]
    fn test_handles_share_one_collection() {
        let store = ClipStore::new();
        let other = store.clone();

        store.push(AudioClip::new(vec![0.5]));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_clip_labels_are_zero_padded() {
        assert_eq!(clip_label(0), "00");
        assert_eq!(clip_label(7), "07");
        assert_eq!(clip_label(12), "12");
    }
}
