use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::production_steps::{self, StepInput, sort_for_display};
use crate::models::productions::{
    self, CreateProduction, NOT_STARTED_LABEL, ProductionStatus, UpdateProduction,
    current_step_label, progress_percent,
};

/// Insert a new production. Progress starts at 0 with no steps.
pub async fn insert_production(
    db: &DatabaseConnection,
    input: CreateProduction,
) -> Result<productions::Model, DbErr> {
    let new_production = productions::ActiveModel {
        id: Set(input.id.unwrap_or_else(Uuid::new_v4)),
        name: Set(input.name),
        status: Set(input.status.unwrap_or(ProductionStatus::Pending)),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        description: Set(input.description),
        progress: Set(0),
        current_step: Set(NOT_STARTED_LABEL.to_string()),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_production.insert(db).await
}

/// Fetch all productions, most recent first.
pub async fn get_all_productions(
    db: &DatabaseConnection,
) -> Result<Vec<productions::Model>, DbErr> {
    productions::Entity::find()
        .order_by_desc(productions::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch a single production by ID.
pub async fn get_production_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<productions::Model>, DbErr> {
    productions::Entity::find_by_id(id).one(db).await
}

/// Update the descriptive fields of a production.
pub async fn update_production(
    db: &DatabaseConnection,
    production: productions::Model,
    input: UpdateProduction,
) -> Result<productions::Model, DbErr> {
    let mut active: productions::ActiveModel = production.into();

    active.name = Set(input.name);
    active.status = Set(input.status);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.description = Set(input.description);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a production and its steps in one transaction.
pub async fn delete_production(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    let txn = db.begin().await?;

    production_steps::Entity::delete_many()
        .filter(production_steps::Column::ProductionId.eq(id))
        .exec(&txn)
        .await?;
    let result = productions::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(result)
}

// ── Steps ──

/// Steps of one production in display order.
pub async fn get_steps_for_production(
    db: &DatabaseConnection,
    production_id: Uuid,
) -> Result<Vec<production_steps::Model>, DbErr> {
    let mut steps = find_steps(db, production_id).await?;
    sort_for_display(&mut steps);
    Ok(steps)
}

/// Every step of every production.
pub async fn get_all_steps(
    db: &DatabaseConnection,
) -> Result<Vec<production_steps::Model>, DbErr> {
    production_steps::Entity::find()
        .order_by_asc(production_steps::Column::ProductionId)
        .order_by_asc(production_steps::Column::StartDate)
        .all(db)
        .await
}

/// Fetch a step only if it belongs to `production_id`.
pub async fn get_step<C: ConnectionTrait>(
    db: &C,
    production_id: Uuid,
    step_id: Uuid,
) -> Result<Option<production_steps::Model>, DbErr> {
    production_steps::Entity::find_by_id(step_id)
        .filter(production_steps::Column::ProductionId.eq(production_id))
        .one(db)
        .await
}

/// Add a step and refresh the production's progress.
pub async fn insert_step(
    db: &DatabaseConnection,
    production_id: Uuid,
    input: StepInput,
) -> Result<production_steps::Model, DbErr> {
    let txn = db.begin().await?;
    lock_production(&txn, production_id).await?;

    let step = production_steps::ActiveModel {
        id: Set(input.id.unwrap_or_else(Uuid::new_v4)),
        production_id: Set(production_id),
        name: Set(input.name),
        status: Set(input.status),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        duration: Set(input.duration),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    }
    .insert(&txn)
    .await?;
    refresh_progress(&txn, production_id).await?;

    txn.commit().await?;
    Ok(step)
}

/// Replace a step's fields and refresh the production's progress.
pub async fn update_step(
    db: &DatabaseConnection,
    step: production_steps::Model,
    input: StepInput,
) -> Result<production_steps::Model, DbErr> {
    let txn = db.begin().await?;
    let production_id = step.production_id;
    lock_production(&txn, production_id).await?;

    let mut active: production_steps::ActiveModel = step.into();
    active.name = Set(input.name);
    active.status = Set(input.status);
    active.start_date = Set(input.start_date);
    active.end_date = Set(input.end_date);
    active.duration = Set(input.duration);
    active.updated_at = Set(Some(chrono::Utc::now()));
    let step = active.update(&txn).await?;

    refresh_progress(&txn, production_id).await?;

    txn.commit().await?;
    Ok(step)
}

/// Remove a step and refresh the production's progress.
pub async fn delete_step(
    db: &DatabaseConnection,
    step: &production_steps::Model,
) -> Result<DeleteResult, DbErr> {
    let txn = db.begin().await?;
    lock_production(&txn, step.production_id).await?;

    let result = production_steps::Entity::delete_by_id(step.id)
        .exec(&txn)
        .await?;
    refresh_progress(&txn, step.production_id).await?;

    txn.commit().await?;
    Ok(result)
}

/// Take the production row lock so step writes on one production run one after another.
async fn lock_production<C: ConnectionTrait>(
    db: &C,
    production_id: Uuid,
) -> Result<productions::Model, DbErr> {
    productions::Entity::find_by_id(production_id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("production {production_id}")))
}

async fn find_steps<C: ConnectionTrait>(
    db: &C,
    production_id: Uuid,
) -> Result<Vec<production_steps::Model>, DbErr> {
    production_steps::Entity::find()
        .filter(production_steps::Column::ProductionId.eq(production_id))
        .order_by_asc(production_steps::Column::StartDate)
        .order_by_asc(production_steps::Column::CreatedAt)
        .all(db)
        .await
}

/// Recompute `progress` and `current_step` from the production's steps.
///
/// Callers hold the production row lock taken by [`lock_production`].
async fn refresh_progress<C: ConnectionTrait>(db: &C, production_id: Uuid) -> Result<(), DbErr> {
    let steps = find_steps(db, production_id).await?;
    let statuses: Vec<ProductionStatus> = steps.iter().map(|s| s.status).collect();

    productions::Entity::update_many()
        .col_expr(
            productions::Column::Progress,
            Expr::value(progress_percent(&statuses)),
        )
        .col_expr(
            productions::Column::CurrentStep,
            Expr::value(current_step_label(&steps)),
        )
        .col_expr(
            productions::Column::UpdatedAt,
            Expr::value(Some(chrono::Utc::now())),
        )
        .filter(productions::Column::Id.eq(production_id))
        .exec(db)
        .await?;

    Ok(())
}
