//! Join-request state machine.
//!
//! States: pending -> accepted | declined. Terminal states are final.
//! Authorization (only the character's owner may file, only the GM may
//! resolve) is enforced by the route layer; this module trusts the caller on
//! identity but always re-validates character *availability*, because it can
//! change between the authorization check and execution.

use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, SqlErr, TransactionError,
    TransactionTrait,
};

use super::DomainError;
use crate::entities::{JoinRequestStatus, character, game, game_character, join_request};

/// Whether the character is currently seated at any game table.
///
/// Deliberately not scoped to one game: a character seated in game A may not
/// even request to join game B.
async fn is_seated<C: ConnectionTrait>(conn: &C, character_id: i32) -> Result<bool, DbErr> {
    let seats = game_character::Entity::find()
        .filter(game_character::Column::CharacterId.eq(character_id))
        .count(conn)
        .await?;
    Ok(seats > 0)
}

/// File a new join request in the `pending` state.
///
/// Duplicate pending requests for the same (game, character) pair are allowed
/// to accumulate; the accept-time re-check keeps them from double-seating.
///
/// # Errors
///
/// `GameNotFound` if the game id does not resolve, `CharacterUnavailable` if
/// the character is already seated anywhere.
pub async fn create_join_request(
    db: &DatabaseConnection,
    game_id: i32,
    user_id: i32,
    character_id: i32,
    message: Option<String>,
) -> Result<join_request::Model, DomainError> {
    if game::Entity::find_by_id(game_id).one(db).await?.is_none() {
        return Err(DomainError::GameNotFound);
    }

    if is_seated(db, character_id).await? {
        return Err(DomainError::CharacterUnavailable);
    }

    let request = join_request::ActiveModel {
        game_id: Set(game_id),
        user_id: Set(user_id),
        character_id: Set(character_id),
        message: Set(message),
        status_code: Set(JoinRequestStatus::Pending),
        ..Default::default()
    };

    let inserted = request.insert(db).await?;
    tracing::debug!(
        request_id = inserted.request_id,
        game_id,
        character_id,
        "join request filed"
    );
    Ok(inserted)
}

/// List a game's join requests matching any of the given statuses, in stable
/// request-id order. An empty filter defaults to pending only.
///
/// # Errors
///
/// Returns `Db` on query failure.
pub async fn list_join_requests(
    db: &DatabaseConnection,
    game_id: i32,
    statuses: &[JoinRequestStatus],
) -> Result<Vec<join_request::Model>, DomainError> {
    let statuses = if statuses.is_empty() {
        &[JoinRequestStatus::Pending]
    } else {
        statuses
    };

    let requests = join_request::Entity::find()
        .filter(join_request::Column::GameId.eq(game_id))
        .filter(join_request::Column::StatusCode.is_in(statuses.iter().copied()))
        .order_by_asc(join_request::Column::RequestId)
        .all(db)
        .await?;
    Ok(requests)
}

/// Accept a pending join request: seat the character and flip the status, in
/// one serializable transaction.
///
/// The request must belong to `game_id`; a request filed against another game
/// is reported as not found, so one game's master cannot resolve another
/// game's inbox by naming their own game in the path.
///
/// Availability is re-checked here, not just at creation time. Two pending
/// requests for the same character can both be filed, but only the first
/// accept wins. The unique seat index backs the in-transaction check: a
/// concurrent accept that slips past the read is still refused at insert.
///
/// # Errors
///
/// `JoinRequestNotFound` if the id does not resolve within `game_id`,
/// `GameNotFound` (the game was removed after the request was filed),
/// `CharacterNotFound`, `RequestAlreadyResolved` for a terminal request,
/// `CharacterUnavailable` if the character was seated in the meantime.
pub async fn accept(
    db: &DatabaseConnection,
    game_id: i32,
    request_id: i32,
) -> Result<join_request::Model, DomainError> {
    let result = db
        .transaction_with_config::<_, join_request::Model, DomainError>(
            move |txn| {
                Box::pin(async move {
                    let request = join_request::Entity::find_by_id(request_id)
                        .one(txn)
                        .await?
                        .filter(|r| r.game_id == game_id)
                        .ok_or(DomainError::JoinRequestNotFound)?;

                    if request.status_code.is_terminal() {
                        return Err(DomainError::RequestAlreadyResolved);
                    }

                    let game = game::Entity::find_by_id(request.game_id)
                        .one(txn)
                        .await?
                        .ok_or(DomainError::GameNotFound)?;

                    let character = character::Entity::find_by_id(request.character_id)
                        .one(txn)
                        .await?
                        .ok_or(DomainError::CharacterNotFound)?;

                    if is_seated(txn, character.character_id).await? {
                        return Err(DomainError::CharacterUnavailable);
                    }

                    let seat = game_character::ActiveModel {
                        game_id: Set(game.game_id),
                        character_id: Set(character.character_id),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await;
                    match seat {
                        Ok(_) => {}
                        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                            return Err(DomainError::CharacterUnavailable);
                        }
                        Err(e) => return Err(e.into()),
                    }

                    let mut active: join_request::ActiveModel = request.into();
                    active.status_code = Set(JoinRequestStatus::Accepted);
                    let updated = active.update(txn).await?;

                    Ok(updated)
                })
            },
            Some(IsolationLevel::Serializable),
            None,
        )
        .await;

    match result {
        Ok(request) => {
            tracing::info!(
                request_id,
                game_id = request.game_id,
                character_id = request.character_id,
                "join request accepted"
            );
            Ok(request)
        }
        Err(TransactionError::Connection(e)) => Err(DomainError::Db(e)),
        Err(TransactionError::Transaction(e)) => Err(e),
    }
}

/// Decline a pending join request. No roster change ever occurs. The request
/// must belong to `game_id`, as in [`accept`].
///
/// # Errors
///
/// `JoinRequestNotFound` if the id does not resolve within `game_id`,
/// `RequestAlreadyResolved` for a terminal request.
pub async fn decline(
    db: &DatabaseConnection,
    game_id: i32,
    request_id: i32,
) -> Result<join_request::Model, DomainError> {
    let request = join_request::Entity::find_by_id(request_id)
        .one(db)
        .await?
        .filter(|r| r.game_id == game_id)
        .ok_or(DomainError::JoinRequestNotFound)?;

    if request.status_code.is_terminal() {
        return Err(DomainError::RequestAlreadyResolved);
    }

    let mut active: join_request::ActiveModel = request.into();
    active.status_code = Set(JoinRequestStatus::Declined);
    let updated = active.update(db).await?;

    tracing::info!(request_id, "join request declined");
    Ok(updated)
}
