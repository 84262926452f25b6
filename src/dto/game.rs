//! DTO definitions for the game record endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GamePatch, GameRecordEntity},
    error::ServiceError,
};

/// Error message for an update body without a usable `game_id`.
pub const MISSING_GAME_ID: &str = "Missing game_id";

/// Response of `POST /init_game`.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct InitGameResponse {
    /// Identifier assigned to the new record.
    pub game_id: i64,
}

/// Body of `POST /update_game`.
///
/// Counters use a double option so that an omitted key (`None`) can be told apart
/// from an explicit `null` (`Some(None)`), which is rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateGameRequest {
    /// Target record. An explicit `null` counts as missing.
    #[serde(default)]
    pub game_id: Option<i64>,
    /// New served count; omitted leaves it untouched.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i64>)]
    pub n_cust_served: Option<Option<i64>>,
    /// New satisfied count; omitted leaves it untouched.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i64>)]
    pub n_cust_satisfied: Option<Option<i64>>,
    /// New unsatisfied count; omitted leaves it untouched.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i64>)]
    pub n_cust_not_satisfied: Option<Option<i64>>,
}

impl UpdateGameRequest {
    /// Storage patch made of the supplied counters. Call after [`Validate::validate`].
    pub fn patch(&self) -> GamePatch {
        GamePatch {
            n_cust_served: self.n_cust_served.flatten(),
            n_cust_satisfied: self.n_cust_satisfied.flatten(),
            n_cust_not_satisfied: self.n_cust_not_satisfied.flatten(),
        }
    }
}

impl TryFrom<serde_json::Value> for UpdateGameRequest {
    type Error = ServiceError;

    /// Decode a raw body, reporting a missing or null `game_id` before any type error
    /// in the counters.
    fn try_from(body: serde_json::Value) -> Result<Self, Self::Error> {
        if body.get("game_id").is_none_or(serde_json::Value::is_null) {
            return Err(ServiceError::InvalidInput(MISSING_GAME_ID.into()));
        }
        serde_json::from_value(body)
            .map_err(|err| ServiceError::InvalidInput(format!("invalid request body: {err}")))
    }
}

impl Validate for UpdateGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let counters = [
            ("n_cust_served", self.n_cust_served),
            ("n_cust_satisfied", self.n_cust_satisfied),
            ("n_cust_not_satisfied", self.n_cust_not_satisfied),
        ];
        for (field, value) in counters {
            if let Some(None) = value {
                let mut err = ValidationError::new("explicit_null");
                err.message = Some(format!("{field} must be an integer, not null").into());
                errors.add(field, err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Response of a successful `POST /update_game`.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UpdateGameResponse {
    /// Always `"success"`.
    pub status: String,
    /// Identifier of the updated record.
    pub game_id: i64,
}

impl UpdateGameResponse {
    /// Acknowledge an update of `game_id`.
    pub fn success(game_id: i64) -> Self {
        Self {
            status: "success".into(),
            game_id,
        }
    }
}

/// One entry of `GET /get_all`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GameRecord {
    /// Record identifier.
    pub game_id: i64,
    /// Customers served.
    pub n_cust_served: i64,
    /// Customers that left satisfied.
    pub n_cust_satisfied: i64,
    /// Customers that left unsatisfied.
    pub n_cust_not_satisfied: i64,
}

impl From<GameRecordEntity> for GameRecord {
    fn from(entity: GameRecordEntity) -> Self {
        Self {
            game_id: entity.game_id,
            n_cust_served: entity.n_cust_served,
            n_cust_satisfied: entity.n_cust_satisfied,
            n_cust_not_satisfied: entity.n_cust_not_satisfied,
        }
    }
}
