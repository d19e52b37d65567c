use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "read")]
    Read,
}

/// SeaORM entity for `admin_messages`: contact messages addressed to the administrator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<Uuid>,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /api/admin_messages[/{user_id}]`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdminMessage {
    #[serde(default)]
    #[validate(email(message = "Email et message sont obligatoires."))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Email et message sont obligatoires."))]
    pub message: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_is_rejected() {
        let body = CreateAdminMessage {
            email: "jeanne@example.com".into(),
            message: "   ".into(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_then_fail_validation() {
        let body: CreateAdminMessage = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn complete_message_is_accepted() {
        let body = CreateAdminMessage {
            email: "jeanne@example.com".into(),
            message: "Bonjour, une question sur ma commande.".into(),
        };
        assert!(body.validate().is_ok());
    }
}
