//! Ordered player registry owned by the game.

use std::collections::BTreeMap;

use color_wars_core::{PlayerId, PlayerSnapshot};

/// Mutable record of a single participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlayerRecord {
    /// Identifier supplied by the game configuration.
    pub(crate) id: PlayerId,
    /// Level sum refreshed by the latest resolution.
    pub(crate) score: u32,
    /// Cleared permanently once the player is eliminated.
    pub(crate) active: bool,
}

impl PlayerRecord {
    fn fresh(id: PlayerId) -> Self {
        Self {
            id,
            score: 0,
            active: true,
        }
    }
}

/// Registry that keeps players in turn order.
#[derive(Clone, Debug)]
pub(crate) struct Roster {
    records: Vec<PlayerRecord>,
}

impl Roster {
    /// Creates a roster with every player active and scoreless.
    pub(crate) fn new(players: &[PlayerId]) -> Self {
        Self {
            records: players.iter().copied().map(PlayerRecord::fresh).collect(),
        }
    }

    /// Restores every record to its freshly created state.
    pub(crate) fn reset(&mut self) {
        for record in &mut self.records {
            *record = PlayerRecord::fresh(record.id);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&PlayerRecord> {
        self.records.get(index)
    }

    /// Turn-order index of the provided player.
    pub(crate) fn position(&self, player: PlayerId) -> Option<usize> {
        self.records.iter().position(|record| record.id == player)
    }

    pub(crate) fn is_active(&self, player: PlayerId) -> bool {
        self.records
            .iter()
            .any(|record| record.id == player && record.active)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.records.iter().filter(|record| record.active).count()
    }

    pub(crate) fn first_active(&self) -> Option<PlayerId> {
        self.records
            .iter()
            .find(|record| record.active)
            .map(|record| record.id)
    }

    /// Index of the next active player after `index`, wrapping around.
    ///
    /// The search visits every record at most once and may land on `index`
    /// itself when it is the only active player. Returns `None` when nobody
    /// is active.
    pub(crate) fn next_active_after(&self, index: usize) -> Option<usize> {
        let len = self.records.len();
        (1..=len)
            .map(|offset| (index + offset) % len)
            .find(|candidate| self.records[*candidate].active)
    }

    /// Replaces every score with the provided totals; absent players score zero.
    pub(crate) fn refresh_scores(&mut self, totals: &BTreeMap<PlayerId, u32>) {
        for record in &mut self.records {
            record.score = totals.get(&record.id).copied().unwrap_or(0);
        }
    }

    /// Deactivates every active player whose score is zero, returning them in turn order.
    pub(crate) fn eliminate_scoreless(&mut self) -> Vec<PlayerId> {
        let mut eliminated = Vec::new();
        for record in &mut self.records {
            if record.active && record.score == 0 {
                record.active = false;
                eliminated.push(record.id);
            }
        }
        eliminated
    }

    pub(crate) fn scores(&self) -> BTreeMap<PlayerId, u32> {
        self.records
            .iter()
            .map(|record| (record.id, record.score))
            .collect()
    }

    pub(crate) fn snapshots(&self) -> Vec<PlayerSnapshot> {
        self.records
            .iter()
            .map(|record| PlayerSnapshot {
                id: record.id,
                active: record.active,
                score: record.score,
            })
            .collect()
    }
}
