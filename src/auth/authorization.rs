use uuid::Uuid;

use crate::error::ApiError;
use crate::models::users;

/// Allow the request when `user` is `owner_id` or an admin.
pub fn ensure_self_or_admin(user: &users::Model, owner_id: Uuid) -> Result<(), ApiError> {
    if user.id == owner_id || user.is_admin() {
        return Ok(());
    }
    Err(ApiError::Forbidden("Accès refusé"))
}

/// Allow the request when `user` is the addressee `email` or an admin.
pub fn ensure_email_or_admin(user: &users::Model, email: &str) -> Result<(), ApiError> {
    if user.is_admin() || user.email.eq_ignore_ascii_case(email) {
        return Ok(());
    }
    Err(ApiError::Forbidden("Accès refusé"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::Roles;

    fn user(role: Roles) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            name: "Jeanne".into(),
            email: "jeanne@example.com".into(),
            password: String::new(),
            role,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn clients_only_reach_their_own_resources() {
        let client = user(Roles::Client);

        assert!(ensure_self_or_admin(&client, client.id).is_ok());
        assert!(ensure_self_or_admin(&client, Uuid::new_v4()).is_err());
    }

    #[test]
    fn admins_reach_everything() {
        let admin = user(Roles::Admin);

        assert!(ensure_self_or_admin(&admin, Uuid::new_v4()).is_ok());
        assert!(ensure_email_or_admin(&admin, "someone@else.fr").is_ok());
    }

    #[test]
    fn email_match_ignores_case() {
        let client = user(Roles::Client);

        assert!(ensure_email_or_admin(&client, "Jeanne@Example.com").is_ok());
        assert!(ensure_email_or_admin(&client, "paul@example.com").is_err());
    }
}
