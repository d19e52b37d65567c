use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::admin_messages::{self, CreateAdminMessage, MessageStatus};

/// Store a contact message, optionally tied to a user.
pub async fn insert_message(
    db: &DatabaseConnection,
    user_id: Option<Uuid>,
    input: CreateAdminMessage,
) -> Result<admin_messages::Model, DbErr> {
    let new_message = admin_messages::ActiveModel {
        user_id: Set(user_id),
        email: Set(input.email.trim().to_string()),
        message: Set(input.message.trim().to_string()),
        status: Set(MessageStatus::New),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    new_message.insert(db).await
}

/// Fetch all messages, newest first.
pub async fn get_all_messages(
    db: &DatabaseConnection,
) -> Result<Vec<admin_messages::Model>, DbErr> {
    admin_messages::Entity::find()
        .order_by_desc(admin_messages::Column::CreatedAt)
        .order_by_desc(admin_messages::Column::Id)
        .all(db)
        .await
}

/// Mark one message as read. `None` when it does not exist.
pub async fn mark_read(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<admin_messages::Model>, DbErr> {
    let Some(message) = admin_messages::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: admin_messages::ActiveModel = message.into();
    active.status = Set(MessageStatus::Read);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await.map(Some)
}

/// Mark every unread message as read. Returns how many changed.
pub async fn mark_all_read(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let result = admin_messages::Entity::update_many()
        .col_expr(admin_messages::Column::Status, Expr::value(MessageStatus::Read))
        .col_expr(
            admin_messages::Column::UpdatedAt,
            Expr::value(Some(chrono::Utc::now())),
        )
        .filter(admin_messages::Column::Status.eq(MessageStatus::New))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Delete one message by ID.
pub async fn delete_message(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    admin_messages::Entity::delete_by_id(id).exec(db).await
}

/// Delete every message.
pub async fn delete_all_messages(db: &DatabaseConnection) -> Result<DeleteResult, DbErr> {
    admin_messages::Entity::delete_many().exec(db).await
}
