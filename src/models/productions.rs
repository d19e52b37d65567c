use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Status shared by production lots and their steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "kebab-case")]
pub enum ProductionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ProductionStatus {
    /// Display order of steps: running work first, finished work last.
    pub fn rank(self) -> u8 {
        match self {
            Self::InProgress => 0,
            Self::Pending => 1,
            Self::Completed => 2,
        }
    }
}

/// SeaORM entity for the `productions` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "productions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub status: ProductionStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub progress: i32,
    pub current_step: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::production_steps::Entity")]
    Steps,
}

impl Related<super::production_steps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/productions`. Progress is derived from the steps,
/// so a new production always starts at 0.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduction {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub name: String,
    pub status: Option<ProductionStatus>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub description: Option<String>,
}

/// Body of `PUT /api/productions/{id}`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduction {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub name: String,
    pub status: ProductionStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub description: Option<String>,
}

// ── Progress ──

pub const NOT_STARTED_LABEL: &str = "Pas démarré";
pub const FINISHED_LABEL: &str = "Terminé";

/// Percentage of work done: completed steps count fully, running steps half.
pub fn progress_percent(statuses: &[ProductionStatus]) -> i32 {
    if statuses.is_empty() {
        return 0;
    }

    let done: f64 = statuses
        .iter()
        .map(|s| match s {
            ProductionStatus::Completed => 1.0,
            ProductionStatus::InProgress => 0.5,
            ProductionStatus::Pending => 0.0,
        })
        .sum();

    (done / statuses.len() as f64 * 100.0).round() as i32
}

/// Label shown next to a production: the running step, else the next one.
pub fn current_step_label(steps: &[super::production_steps::Model]) -> String {
    if let Some(step) = steps
        .iter()
        .find(|s| s.status == ProductionStatus::InProgress)
    {
        return step.name.clone();
    }
    if let Some(step) = steps.iter().find(|s| s.status == ProductionStatus::Pending) {
        return format!("Prochaine: {}", step.name);
    }
    if !steps.is_empty() {
        return FINISHED_LABEL.to_string();
    }
    NOT_STARTED_LABEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::super::production_steps;
    use super::*;
    use ProductionStatus::*;

    fn step(name: &str, status: ProductionStatus) -> production_steps::Model {
        production_steps::Model {
            id: Uuid::new_v4(),
            production_id: Uuid::nil(),
            name: name.to_string(),
            status,
            start_date: None,
            end_date: None,
            duration: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn progress_of_no_steps_is_zero() {
        assert_eq!(progress_percent(&[]), 0);
    }

    #[test]
    fn progress_counts_running_steps_as_half() {
        assert_eq!(progress_percent(&[Completed, InProgress, Pending]), 50);
        assert_eq!(progress_percent(&[Completed, Completed, InProgress]), 83);
        assert_eq!(progress_percent(&[Pending, Pending]), 0);
        assert_eq!(progress_percent(&[Completed]), 100);
    }

    #[test]
    fn progress_rounds_to_nearest() {
        // 0.5 / 3 = 16.67%
        assert_eq!(progress_percent(&[InProgress, Pending, Pending]), 17);
    }

    #[test]
    fn label_prefers_running_step() {
        let steps = vec![
            step("Vendange", Completed),
            step("Pressurage", Pending),
            step("Fermentation", InProgress),
        ];
        assert_eq!(current_step_label(&steps), "Fermentation");
    }

    #[test]
    fn label_announces_next_pending_step() {
        let steps = vec![step("Vendange", Completed), step("Pressurage", Pending)];
        assert_eq!(current_step_label(&steps), "Prochaine: Pressurage");
    }

    #[test]
    fn label_for_finished_and_empty_productions() {
        let steps = vec![step("Vendange", Completed), step("Mise en bouteille", Completed)];
        assert_eq!(current_step_label(&steps), FINISHED_LABEL);
        assert_eq!(current_step_label(&[]), NOT_STARTED_LABEL);
    }

    #[test]
    fn status_uses_kebab_case_in_json() {
        assert_eq!(serde_json::to_value(InProgress).unwrap(), "in-progress");
    }
}
