//! Adventure versioning policy.
//!
//! A logical adventure (`adventure_id`) is materialized as one or more
//! physical rows (`aid`); the row with the maximum `aid` is the current
//! version. Updates mutate the current row in place while it is unlocked and
//! fork a fresh row once it is locked, leaving history untouched.

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionError, TransactionTrait,
};

use super::DomainError;
use crate::entities::adventure;

/// Partial update payload. Unset fields are left alone on the in-place path
/// and (deliberately) not carried over on the fork path.
#[derive(Debug, Default, Clone)]
pub struct AdventurePatch {
    pub name: Option<String>,
    pub plot: Option<String>,
}

/// Resolve the current version of a logical adventure: the row with the
/// maximum `aid`, or `None` if the id is unknown.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn current(
    db: &DatabaseConnection,
    adventure_id: i32,
) -> Result<Option<adventure::Model>, DbErr> {
    adventure::Entity::find()
        .filter(adventure::Column::AdventureId.eq(adventure_id))
        .order_by_desc(adventure::Column::Aid)
        .one(db)
        .await
}

/// List the current version of every logical adventure, optionally filtered
/// by a substring match over name or plot, in logical-id order.
///
/// # Errors
///
/// Returns `Db` on query failure.
pub async fn list(
    db: &DatabaseConnection,
    q: Option<&str>,
    offset: u64,
    limit: u64,
) -> Result<Vec<adventure::Model>, DomainError> {
    // (adventure_id, max(aid)) pairs pick exactly one row per logical id
    let latest = Query::select()
        .column(adventure::Column::AdventureId)
        .expr(adventure::Column::Aid.max())
        .from(adventure::Entity)
        .group_by_col(adventure::Column::AdventureId)
        .to_owned();

    let mut select = adventure::Entity::find().filter(
        Expr::tuple([
            Expr::col(adventure::Column::AdventureId).into(),
            Expr::col(adventure::Column::Aid).into(),
        ])
        .in_subquery(latest),
    );

    if let Some(q) = q {
        select = select.filter(
            Condition::any()
                .add(adventure::Column::Name.contains(q))
                .add(adventure::Column::Plot.contains(q)),
        );
    }

    let adventures = select
        .order_by_asc(adventure::Column::AdventureId)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(adventures)
}

/// Create a brand-new adventure: insert the row, then assign its logical id
/// equal to its own freshly allocated `aid`, all in one transaction. A new
/// adventure is version 1 of itself.
///
/// # Errors
///
/// Returns `Db` on insert failure.
pub async fn create(
    db: &DatabaseConnection,
    name: String,
    plot: Option<String>,
) -> Result<adventure::Model, DomainError> {
    let result = db
        .transaction::<_, adventure::Model, DomainError>(|txn| {
            Box::pin(async move {
                let now = Utc::now().fixed_offset();
                let inserted = adventure::ActiveModel {
                    name: Set(name),
                    plot: Set(plot),
                    is_active: Set(true),
                    is_locked: Set(false),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                let aid = inserted.aid;
                let mut active: adventure::ActiveModel = inserted.into();
                active.adventure_id = Set(aid);
                let bootstrapped = active.update(txn).await?;

                Ok(bootstrapped)
            })
        })
        .await;

    match result {
        Ok(created) => {
            tracing::debug!(adventure_id = created.adventure_id, "adventure created");
            Ok(created)
        }
        Err(TransactionError::Connection(e)) => Err(DomainError::Db(e)),
        Err(TransactionError::Transaction(e)) => Err(e),
    }
}

/// Apply a partial update to the current version of a logical adventure.
///
/// Unlocked current version: mutate it in place; the row count for the
/// logical id does not change and neither does its `aid`. Locked current
/// version: fork a new row under the same logical id carrying only the
/// supplied fields, leaving the locked row untouched.
///
/// # Errors
///
/// `AdventureNotFound` if the logical id does not resolve.
pub async fn update(
    db: &DatabaseConnection,
    adventure_id: i32,
    patch: AdventurePatch,
) -> Result<adventure::Model, DomainError> {
    let existing = current(db, adventure_id)
        .await?
        .ok_or(DomainError::AdventureNotFound)?;

    let now = Utc::now().fixed_offset();

    if existing.is_locked {
        // Fork path: unset fields are not inherited from the prior version
        let fork = adventure::ActiveModel {
            adventure_id: Set(existing.adventure_id),
            name: patch.name.map_or(NotSet, Set),
            plot: patch.plot.map_or(NotSet, |p| Set(Some(p))),
            is_active: Set(true),
            is_locked: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let forked = fork.insert(db).await?;
        tracing::debug!(adventure_id, aid = forked.aid, "adventure forked");
        return Ok(forked);
    }

    let mut active: adventure::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(plot) = patch.plot {
        active.plot = Set(Some(plot));
    }
    active.updated_at = Set(now);
    let updated = active.update(db).await?;
    Ok(updated)
}

/// Deactivate the current version of a logical adventure and return the
/// logical id.
///
/// # Errors
///
/// `AdventureNotFound` if the logical id does not resolve.
pub async fn disable(db: &DatabaseConnection, adventure_id: i32) -> Result<i32, DomainError> {
    let existing = current(db, adventure_id)
        .await?
        .ok_or(DomainError::AdventureNotFound)?;

    let logical_id = existing.adventure_id;
    let mut active: adventure::ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(db).await?;

    Ok(logical_id)
}
