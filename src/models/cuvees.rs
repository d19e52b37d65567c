use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `cuvees` table (wine products of the catalogue).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cuvees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub nom: String,
    pub annee: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub wine_type: String,
    pub cepage: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub prix: f64,
    pub stock: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stocks::Entity")]
    Stocks,
}

impl Related<super::stocks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stocks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/cuvees` and `PUT /api/cuvees/{id}` (full replacement).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CuveeInput {
    #[validate(length(min = 1, message = "Le nom est obligatoire"))]
    pub nom: String,
    #[validate(range(min = 1800, max = 2200, message = "Année invalide"))]
    pub annee: i32,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Le type est obligatoire"))]
    pub wine_type: String,
    #[validate(length(min = 1, message = "Le cépage est obligatoire"))]
    pub cepage: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Le prix doit être positif"))]
    pub prix: f64,
    #[validate(range(min = 0, message = "Le stock doit être positif"))]
    pub stock: i32,
}

// ── Stock alerts ──

pub const CRITICAL_STOCK_THRESHOLD: i32 = 5;
pub const LOW_STOCK_THRESHOLD: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Critical,
    Low,
    Ok,
}

impl AlertLevel {
    pub fn classify(stock: i32) -> Self {
        if stock <= CRITICAL_STOCK_THRESHOLD {
            Self::Critical
        } else if stock <= LOW_STOCK_THRESHOLD {
            Self::Low
        } else {
            Self::Ok
        }
    }

    pub fn threshold(self) -> Option<i32> {
        match self {
            Self::Critical => Some(CRITICAL_STOCK_THRESHOLD),
            Self::Low => Some(LOW_STOCK_THRESHOLD),
            Self::Ok => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub cuvee_id: Uuid,
    pub cuvee_name: String,
    pub current_stock: i32,
    pub threshold: i32,
    pub status: AlertLevel,
}

/// Alerts for every cuvée below the low threshold, most critical first,
/// then lowest stock first.
pub fn stock_alerts(cuvees: &[Model]) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = cuvees
        .iter()
        .filter_map(|c| {
            let status = AlertLevel::classify(c.stock);
            status.threshold().map(|threshold| StockAlert {
                cuvee_id: c.id,
                cuvee_name: c.nom.clone(),
                current_stock: c.stock,
                threshold,
                status,
            })
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then(a.current_stock.cmp(&b.current_stock))
    });
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cuvee(nom: &str, stock: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            nom: nom.to_string(),
            annee: 2021,
            wine_type: "rouge".to_string(),
            cepage: "Merlot".to_string(),
            description: None,
            prix: 12.5,
            stock,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn classify_uses_inclusive_thresholds() {
        assert_eq!(AlertLevel::classify(0), AlertLevel::Critical);
        assert_eq!(AlertLevel::classify(5), AlertLevel::Critical);
        assert_eq!(AlertLevel::classify(6), AlertLevel::Low);
        assert_eq!(AlertLevel::classify(15), AlertLevel::Low);
        assert_eq!(AlertLevel::classify(16), AlertLevel::Ok);
    }

    #[test]
    fn negative_stock_is_critical() {
        assert_eq!(AlertLevel::classify(-3), AlertLevel::Critical);
    }

    #[test]
    fn alerts_skip_healthy_stock_and_sort_by_severity() {
        let cuvees = vec![
            cuvee("Bordeaux", 12),
            cuvee("Chablis", 40),
            cuvee("Pomerol", 4),
            cuvee("Sancerre", 7),
            cuvee("Margaux", 1),
        ];

        let alerts = stock_alerts(&cuvees);
        let names: Vec<&str> = alerts.iter().map(|a| a.cuvee_name.as_str()).collect();

        assert_eq!(names, vec!["Margaux", "Pomerol", "Sancerre", "Bordeaux"]);
        assert_eq!(alerts[0].threshold, 5);
        assert_eq!(alerts[3].threshold, 15);
    }

    #[test]
    fn cuvee_json_uses_type_key() {
        let json = serde_json::to_value(cuvee("Bordeaux", 3)).unwrap();
        assert_eq!(json["type"], "rouge");
        assert!(json.get("wine_type").is_none());
    }
}
