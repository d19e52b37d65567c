use sea_orm::*;
use uuid::Uuid;

use crate::models::settings::{self, SINGLETON_ID, UpdateSettings};
use crate::models::user_settings;

/// Read the site-wide flags. A missing row reads as the defaults.
pub async fn get_settings<C: ConnectionTrait>(db: &C) -> Result<settings::Model, DbErr> {
    Ok(settings::Entity::find_by_id(SINGLETON_ID)
        .one(db)
        .await?
        .unwrap_or_default())
}

/// Update the site-wide flags, creating the row if it was never seeded.
pub async fn update_settings(
    db: &DatabaseConnection,
    input: UpdateSettings,
) -> Result<settings::Model, DbErr> {
    match settings::Entity::find_by_id(SINGLETON_ID).one(db).await? {
        Some(current) => {
            let mut active: settings::ActiveModel = current.into();
            if let Some(maintenance) = input.maintenance {
                active.maintenance = Set(maintenance);
            }
            if let Some(registration) = input.registration {
                active.registration = Set(registration);
            }
            active.update(db).await
        }
        None => {
            let defaults = settings::Model::default();
            settings::ActiveModel {
                id: Set(SINGLETON_ID),
                maintenance: Set(input.maintenance.unwrap_or(defaults.maintenance)),
                registration: Set(input.registration.unwrap_or(defaults.registration)),
            }
            .insert(db)
            .await
        }
    }
}

// ── Per-user preferences ──

/// Stored preferences of one user, if any.
pub async fn get_user_settings(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<user_settings::Model>, DbErr> {
    user_settings::Entity::find_by_id(user_id).one(db).await
}

/// Insert or replace the preferences object of one user.
pub async fn upsert_user_settings(
    db: &DatabaseConnection,
    user_id: Uuid,
    value: serde_json::Value,
) -> Result<user_settings::Model, DbErr> {
    let now = chrono::Utc::now();

    match get_user_settings(db, user_id).await? {
        Some(existing) => {
            let mut active: user_settings::ActiveModel = existing.into();
            active.settings = Set(value);
            active.updated_at = Set(Some(now));
            active.update(db).await
        }
        None => {
            user_settings::ActiveModel {
                user_id: Set(user_id),
                settings: Set(value),
                created_at: Set(now),
                updated_at: Set(None),
            }
            .insert(db)
            .await
        }
    }
}
