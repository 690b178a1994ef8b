//! Authorization policy.
//!
//! Stateless predicates over already-loaded rows. Absence of rights is always
//! expressed as `false`; the calling handler decides whether that becomes a
//! 403, or a 404 when existence must be hidden (character access by
//! non-owners).

use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter};

use crate::entities::{character, game, user};

/// True iff `game_id` is among the games the user is recorded as master of.
///
/// Mastery is never inferred from any other relation (seated characters,
/// pending requests).
#[must_use]
pub fn is_game_master(mastered_games: &[game::Model], game_id: i32) -> bool {
    mastered_games.iter().any(|g| g.game_id == game_id)
}

/// True iff `character_id` is among the user's characters.
///
/// Disabled characters still count as owned: the 404-vs-403 disambiguation on
/// character access depends on ownership, not liveness.
#[must_use]
pub fn owns_character(owned_characters: &[character::Model], character_id: i32) -> bool {
    owned_characters
        .iter()
        .any(|c| c.character_id == character_id)
}

/// Exact id equality between the principal and the target user.
#[must_use]
pub const fn is_self(user: &user::Model, target_user_id: i32) -> bool {
    user.user_id == target_user_id
}

/// Load every game the user is master of, for use with [`is_game_master`].
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn mastered_games(
    db: &sea_orm::DatabaseConnection,
    user_id: i32,
) -> Result<Vec<game::Model>, DbErr> {
    game::Entity::find()
        .filter(game::Column::GameMasterId.eq(user_id))
        .all(db)
        .await
}

/// Load every character the user owns, disabled included, for use with
/// [`owns_character`].
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn owned_characters(
    db: &sea_orm::DatabaseConnection,
    user_id: i32,
) -> Result<Vec<character::Model>, DbErr> {
    character::Entity::find()
        .filter(character::Column::UserOwnerId.eq(user_id))
        .all(db)
        .await
}
