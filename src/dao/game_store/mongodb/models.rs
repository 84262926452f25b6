use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::{GameId, GamePatch, GameRecordEntity};

/// Stored shape of a game record; the game id doubles as the document `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    game_id: GameId,
    #[serde(default)]
    n_cust_served: i64,
    #[serde(default)]
    n_cust_satisfied: i64,
    #[serde(default)]
    n_cust_not_satisfied: i64,
}

impl From<GameRecordEntity> for MongoGameDocument {
    fn from(value: GameRecordEntity) -> Self {
        Self {
            game_id: value.game_id,
            n_cust_served: value.n_cust_served,
            n_cust_satisfied: value.n_cust_satisfied,
            n_cust_not_satisfied: value.n_cust_not_satisfied,
        }
    }
}

impl From<MongoGameDocument> for GameRecordEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            game_id: value.game_id,
            n_cust_served: value.n_cust_served,
            n_cust_satisfied: value.n_cust_satisfied,
            n_cust_not_satisfied: value.n_cust_not_satisfied,
        }
    }
}

/// Filter selecting the document of record `id`.
pub fn doc_id(id: GameId) -> Document {
    doc! {"_id": id}
}

/// `$set` body holding only the counters present in the patch.
pub fn set_fields(patch: &GamePatch) -> Document {
    let mut fields = Document::new();
    if let Some(served) = patch.n_cust_served {
        fields.insert("n_cust_served", served);
    }
    if let Some(satisfied) = patch.n_cust_satisfied {
        fields.insert("n_cust_satisfied", satisfied);
    }
    if let Some(not_satisfied) = patch.n_cust_not_satisfied {
        fields.insert("n_cust_not_satisfied", not_satisfied);
    }
    fields
}
