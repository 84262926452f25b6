use serde::{Deserialize, Serialize};

/// Identifier assigned by the store to every game record.
pub type GameId = i64;

/// Game record persisted by the storage layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecordEntity {
    /// Primary key, assigned on creation and never reused.
    pub game_id: GameId,
    /// Number of customers served during the game.
    pub n_cust_served: i64,
    /// Number of customers that left satisfied.
    pub n_cust_satisfied: i64,
    /// Number of customers that left unsatisfied.
    pub n_cust_not_satisfied: i64,
}

impl GameRecordEntity {
    /// Fresh record with every counter at zero.
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            n_cust_served: 0,
            n_cust_satisfied: 0,
            n_cust_not_satisfied: 0,
        }
    }

    /// Overwrite the counters present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &GamePatch) {
        if let Some(served) = patch.n_cust_served {
            self.n_cust_served = served;
        }
        if let Some(satisfied) = patch.n_cust_satisfied {
            self.n_cust_satisfied = satisfied;
        }
        if let Some(not_satisfied) = patch.n_cust_not_satisfied {
            self.n_cust_not_satisfied = not_satisfied;
        }
    }
}

/// Partial update of a game record. `None` leaves the stored counter as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamePatch {
    /// New served count.
    pub n_cust_served: Option<i64>,
    /// New satisfied count.
    pub n_cust_satisfied: Option<i64>,
    /// New unsatisfied count.
    pub n_cust_not_satisfied: Option<i64>,
}

impl GamePatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.n_cust_served.is_none()
            && self.n_cust_satisfied.is_none()
            && self.n_cust_not_satisfied.is_none()
    }
}
