use std::{fmt, path::PathBuf};

use serde::Deserialize;

/// Identifier of a playable item in the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl PlaybackPhase {
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackPhase::Playing)
    }
}

/// Read-only view of the current item and its playback phase.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: ItemId,
    pub name: String,
    pub section_name: String,
    pub section_count: usize,
    pub cover_file: PathBuf,
    /// The user asked for the generated cover instead of the file.
    pub use_cover_replacement: bool,
    pub phase: PlaybackPhase,
}

impl SessionSnapshot {
    /// A single section leaves nothing for the subtitle to distinguish.
    pub fn is_single_section(&self) -> bool {
        self.section_count == 1
    }
}

/// Source of the current session. Owned and mutated elsewhere.
pub trait SessionStore {
    fn current_session_id(&self) -> Option<ItemId>;
    fn snapshot_by_id(&self, id: ItemId) -> Option<SessionSnapshot>;

    fn current_snapshot(&self) -> Option<SessionSnapshot> {
        self.current_session_id()
            .and_then(|id| self.snapshot_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapStore {
        current: Option<ItemId>,
        items: HashMap<ItemId, SessionSnapshot>,
    }

    impl SessionStore for MapStore {
        fn current_session_id(&self) -> Option<ItemId> {
            self.current
        }

        fn snapshot_by_id(&self, id: ItemId) -> Option<SessionSnapshot> {
            self.items.get(&id).cloned()
        }
    }

    fn snapshot(id: u64, sections: usize) -> SessionSnapshot {
        SessionSnapshot {
            id: ItemId(id),
            name: "Moby Dick".to_string(),
            section_name: "Loomings".to_string(),
            section_count: sections,
            cover_file: PathBuf::from("/nonexistent/cover.jpg"),
            use_cover_replacement: false,
            phase: PlaybackPhase::Paused,
        }
    }

    #[test]
    fn current_snapshot_requires_both_id_and_item() {
        let mut store = MapStore {
            current: None,
            items: HashMap::from([(ItemId(1), snapshot(1, 3))]),
        };
        assert!(store.current_snapshot().is_none());

        store.current = Some(ItemId(2));
        assert!(store.current_snapshot().is_none());

        store.current = Some(ItemId(1));
        assert_eq!(store.current_snapshot().map(|s| s.id), Some(ItemId(1)));
    }

    #[test]
    fn single_section_only_for_exactly_one() {
        assert!(snapshot(1, 1).is_single_section());
        assert!(!snapshot(1, 0).is_single_section());
        assert!(!snapshot(1, 2).is_single_section());
    }

    #[test]
    fn only_playing_counts_as_playing() {
        assert!(PlaybackPhase::Playing.is_playing());
        assert!(!PlaybackPhase::Paused.is_playing());
        assert!(!PlaybackPhase::Stopped.is_playing());
    }
}
