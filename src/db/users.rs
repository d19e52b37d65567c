use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, Roles};

/// Fields of a user row about to be inserted. `password` is already hashed.
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Roles,
}

/// Insert a new user.
pub async fn insert_user(db: &DatabaseConnection, input: NewUser) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        email: Set(input.email),
        password: Set(input.password),
        role: Set(input.role),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch all users.
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch a single user by email (exact match).
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Whether another user than `except` already uses `email`.
pub async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    except: Option<Uuid>,
) -> Result<bool, DbErr> {
    let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(users::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Update name and/or email.
pub async fn update_profile(
    db: &DatabaseConnection,
    user: users::Model,
    name: Option<String>,
    email: Option<String>,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();

    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(email) = email {
        active.email = Set(email);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Replace the stored password hash.
pub async fn set_password(
    db: &DatabaseConnection,
    user: users::Model,
    password_hash: String,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();
    active.password = Set(password_hash);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a user by ID.
pub async fn delete_user(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    users::Entity::delete_by_id(id).exec(db).await
}
