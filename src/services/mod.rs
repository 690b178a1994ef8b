//! Domain services: the join-request state machine, the adventure versioning
//! policy, and the shared error taxonomy they raise.

pub mod adventure_service;
pub mod join_service;

use sea_orm::DbErr;

/// Typed domain violations, raised at the point of detection and translated
/// to a transport status exactly once in `error.rs`.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("No user with specified id")]
    UserNotFound,
    #[error("No game with specified id")]
    GameNotFound,
    #[error("No character with specified id")]
    CharacterNotFound,
    #[error("No join request with specified id")]
    JoinRequestNotFound,
    #[error("No adventure with specified id")]
    AdventureNotFound,
    #[error("No item with specified id")]
    ItemNotFound,
    #[error("Username is not unique")]
    UsernameNotUnique,
    #[error("Provided character already participates in another game")]
    CharacterUnavailable,
    #[error("Join request is already resolved")]
    RequestAlreadyResolved,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Outcome of a soft-delete.
///
/// Replaces the ambiguous "false means something went wrong" convention: a
/// caller can tell a missing row from a repeat disable without guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableOutcome {
    Disabled,
    AlreadyDisabled,
    NotFound,
}
