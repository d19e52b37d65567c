use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The `Roles` enum maps to a MySQL VARCHAR column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "client")]
    Client,
}

/// SeaORM entity for the `users` table.
///
/// Deliberately not `Serialize`: the password hash must only leave this
/// module through [`UserResponse`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub role: Roles,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_settings::Entity")]
    UserSettings,
}

impl Related<super::user_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSettings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == Roles::Admin
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Body of `POST /api/users` (admin-created accounts).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub name: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[validate(length(min = 6, message = "Le mot de passe doit contenir au moins 6 caractères"))]
    pub password: String,
    pub role: Option<Roles>,
}

/// Body of `POST /api/auth/register`. The SPA historically sent `nom`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[serde(alias = "nom")]
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub name: String,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[validate(length(min = 6, message = "Le mot de passe doit contenir au moins 6 caractères"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /api/users/{id}`. Only name and email are editable here.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub name: Option<String>,
    #[validate(email(message = "Adresse email invalide"))]
    pub email: Option<String>,
}

/// Body of `PUT /api/password/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    pub current_password: Option<String>,
    #[validate(length(min = 6, message = "Le mot de passe doit contenir au moins 6 caractères"))]
    pub new_password: String,
}

/// A safe user representation for API responses (never leaks the password).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Roles,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Returned by login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_accepts_legacy_nom_field() {
        let body: RegisterUser = serde_json::from_value(serde_json::json!({
            "nom": "Jeanne",
            "email": "jeanne@example.com",
            "password": "secret12",
        }))
        .unwrap();

        assert_eq!(body.name, "Jeanne");
        assert!(body.validate().is_ok());
    }

    #[test]
    fn register_rejects_bad_email_and_short_password() {
        let body = RegisterUser {
            name: "Jeanne".into(),
            email: "not-an-email".into(),
            password: "123".into(),
        };

        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_value(Roles::Admin).unwrap(), "admin");
        let role: Roles = serde_json::from_value(serde_json::json!("client")).unwrap();
        assert_eq!(role, Roles::Client);
    }
}
