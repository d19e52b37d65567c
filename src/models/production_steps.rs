use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::productions::ProductionStatus;

/// SeaORM entity for the `production_steps` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_steps")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[serde(rename = "production_id")]
    pub production_id: Uuid,
    pub name: String,
    pub status: ProductionStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Planned duration in days.
    pub duration: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::productions::Entity",
        from = "Column::ProductionId",
        to = "super::productions::Column::Id"
    )]
    Production,
}

impl Related<super::productions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Production.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /api/productions/{id}/steps` and `PUT .../steps/{step_id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Le nom de l'étape est obligatoire"))]
    pub name: String,
    pub status: ProductionStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[validate(range(min = 0, message = "La durée doit être positive"))]
    pub duration: Option<i32>,
}

/// Steps in display order: by status rank, then by start date.
pub fn sort_for_display(steps: &mut [Model]) {
    steps.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then(a.start_date.cmp(&b.start_date))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn step(name: &str, status: ProductionStatus, day: u32) -> Model {
        Model {
            id: Uuid::new_v4(),
            production_id: Uuid::nil(),
            name: name.to_string(),
            status,
            start_date: NaiveDate::from_ymd_opt(2024, 9, day),
            end_date: None,
            duration: Some(3),
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn display_order_is_running_pending_completed() {
        let mut steps = vec![
            step("Vendange", ProductionStatus::Completed, 1),
            step("Élevage", ProductionStatus::Pending, 20),
            step("Pressurage", ProductionStatus::Pending, 10),
            step("Fermentation", ProductionStatus::InProgress, 15),
        ];

        sort_for_display(&mut steps);
        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, vec!["Fermentation", "Pressurage", "Élevage", "Vendange"]);
    }

    #[test]
    fn step_json_keeps_production_id_key() {
        let json = serde_json::to_value(step("Vendange", ProductionStatus::Pending, 1)).unwrap();
        assert!(json.get("production_id").is_some());
        assert!(json.get("startDate").is_some());
    }
}
