///! Database-backed checks against a mocked MySQL connection.
///!
///! Each test queues the rows and exec results its queries will consume, in
///! order, then inspects the answer and the transaction log.
///!
///! Run with: `cargo test --test db_test`
use std::collections::BTreeMap;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Transaction, Value};
use uuid::Uuid;

use vinexpert_backend::auth::jwt::JwtKeys;
use vinexpert_backend::auth::password::hash_password;
use vinexpert_backend::db::orders::{self as order_db, OrderError};
use vinexpert_backend::db::productions as production_db;
use vinexpert_backend::handlers;
use vinexpert_backend::models::orders::{CreateOrder, OrderLine, OrderStatus};
use vinexpert_backend::models::production_steps::StepInput;
use vinexpert_backend::models::productions::{NOT_STARTED_LABEL, ProductionStatus};
use vinexpert_backend::models::users::Roles;
use vinexpert_backend::models::{
    cuvees, invoices, order_items, orders, production_steps, productions, settings, users,
};

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

macro_rules! test_app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($db))
                .app_data(web::Data::new(keys()))
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    };
}

fn keys() -> JwtKeys {
    JwtKeys::new(TEST_SECRET, Duration::from_secs(3600))
}

fn bearer(user: &users::Model) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", keys().issue(user).unwrap()))
}

fn user(role: Roles, password: &str) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        name: "Jeanne Martin".into(),
        email: "jeanne@example.com".into(),
        password: password.into(),
        role,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn cuvee(stock: i32) -> cuvees::Model {
    cuvees::Model {
        id: Uuid::new_v4(),
        nom: "Pomerol".into(),
        annee: 2019,
        wine_type: "rouge".into(),
        cepage: "Merlot".into(),
        description: None,
        prix: 20.0,
        stock,
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn order_for(client: &users::Model, cuvee_id: Uuid, quantity: i32) -> CreateOrder {
    CreateOrder {
        id: None,
        client_id: client.id,
        client_name: client.name.clone(),
        status: None,
        shipping_address: "1 rue des Vignes".into(),
        country: "FR".into(),
        items: vec![OrderLine {
            id: cuvee_id,
            quantity,
        }],
    }
}

fn statements(log: &[Transaction]) -> Vec<String> {
    log.iter()
        .flat_map(|t| t.statements().iter().map(|s| s.sql.clone()))
        .collect()
}

fn statement_values<'a>(log: &'a [Transaction], prefix: &str) -> Vec<&'a Value> {
    log.iter()
        .flat_map(|t| t.statements())
        .filter(|s| s.sql.starts_with(prefix))
        .flat_map(|s| s.values.iter().flat_map(|v| v.0.iter()))
        .collect()
}

async fn message_of(resp: actix_web::dev::ServiceResponse) -> String {
    let body: serde_json::Value = test::read_body_json(resp).await;
    body["message"].as_str().unwrap_or_default().to_string()
}

// ── Catalogue ──

#[actix_web::test]
async fn test_created_cuvee_can_be_fetched() {
    let admin = user(Roles::Admin, "");
    let stored = cuvee(24);
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[admin.clone()]])
        .append_query_results([[stored.clone()], [stored.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = test_app!(db.clone());

    let req = test::TestRequest::post()
        .uri("/api/cuvees")
        .insert_header(bearer(&admin))
        .set_json(serde_json::json!({
            "nom": "Pomerol",
            "annee": 2019,
            "type": "rouge",
            "cepage": "Merlot",
            "prix": 20.0,
            "stock": 24,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/cuvees/{}", stored.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: serde_json::Value = test::read_body_json(resp).await;

    assert_eq!(created, fetched);
    assert_eq!(fetched["nom"], "Pomerol");
    assert!(
        statements(&db.into_transaction_log())
            .iter()
            .any(|sql| sql.starts_with("INSERT INTO `cuvees`"))
    );
}

#[actix_web::test]
async fn test_deleting_missing_cuvee_is_not_found() {
    let admin = user(Roles::Admin, "");
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[admin.clone()]])
        .append_query_results([Vec::<cuvees::Model>::new()])
        .into_connection();
    let app = test_app!(db.clone());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/cuvees/{}", Uuid::new_v4()))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(resp).await, "Cuvée introuvable");
    assert!(
        !statements(&db.into_transaction_log())
            .iter()
            .any(|sql| sql.starts_with("DELETE"))
    );
}

// ── Accounts ──

#[actix_web::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let stored = user(Roles::Client, &hash_password("bon-mot-de-passe").unwrap());
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[stored]])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "jeanne@example.com",
            "password": "mauvais",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message_of(resp).await, "Email ou mot de passe incorrect");
}

#[actix_web::test]
async fn test_login_with_unknown_email_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "email": "personne@example.com",
            "password": "peu-importe",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message_of(resp).await, "Email ou mot de passe incorrect");
}

#[actix_web::test]
async fn test_register_with_taken_email_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<settings::Model>::new()])
        .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(1)))])]])
        .into_connection();
    let app = test_app!(db.clone());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(serde_json::json!({
            "name": "Jeanne Martin",
            "email": "jeanne@example.com",
            "password": "secret123",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message_of(resp).await, "Cet email est déjà utilisé");
    assert!(
        !statements(&db.into_transaction_log())
            .iter()
            .any(|sql| sql.starts_with("INSERT"))
    );
}

#[actix_web::test]
async fn test_password_change_with_unreadable_hash_is_unauthorized() {
    let client = user(Roles::Client, "pbkdf2:sha256:tronqué");
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[client.clone()], [client.clone()]])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::put()
        .uri(&format!("/api/password/{}", client.id))
        .insert_header(bearer(&client))
        .set_json(serde_json::json!({
            "currentPassword": "ancien",
            "newPassword": "nouveau-secret",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message_of(resp).await, "Mot de passe actuel incorrect");
}

// ── Orders ──

#[actix_web::test]
async fn test_order_without_items_is_bad_request() {
    let client = user(Roles::Client, "");
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[client.clone()]])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header(bearer(&client))
        .set_json(serde_json::json!({
            "clientId": client.id,
            "clientName": client.name,
            "shippingAddress": "1 rue des Vignes",
            "country": "FR",
            "items": [],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Données invalides");
    assert!(body["errors"].get("items").is_some());
}

#[actix_web::test]
async fn test_order_beyond_stock_is_conflict_and_commits_nothing() {
    let client = user(Roles::Client, "");
    let short = cuvee(1);
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[client.clone()]])
        .append_query_results([[short.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let app = test_app!(db.clone());

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header(bearer(&client))
        .set_json(serde_json::json!({
            "clientId": client.id,
            "clientName": client.name,
            "shippingAddress": "1 rue des Vignes",
            "country": "FR",
            "items": [{ "id": short.id, "name": "Pomerol", "price": 20.0, "quantity": 3 }],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(message_of(resp).await, "Stock insuffisant pour Pomerol");

    let sql = statements(&db.into_transaction_log());
    assert!(!sql.iter().any(|s| s == "COMMIT"));
    assert!(!sql.iter().any(|s| s.starts_with("INSERT")));
    assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn test_order_lines_are_priced_from_the_catalogue() {
    let client = user(Roles::Client, "");
    let wine = cuvee(10);
    let order = orders::Model {
        id: Uuid::new_v4(),
        client_id: client.id,
        client_name: client.name.clone(),
        total: 40.0,
        date: chrono::Utc::now(),
        status: OrderStatus::Pending,
        shipping_address: "1 rue des Vignes".into(),
        country: "FR".into(),
        quantity: 2,
        updated_at: None,
    };
    let item = order_items::Model {
        id: Uuid::new_v4(),
        name: wine.nom.clone(),
        price: wine.prix,
        quantity: 2,
        order_id: order.id,
        client_id: client.id,
        cuvee_id: Some(wine.id),
    };
    let written = MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    };
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[wine.clone()]])
        .append_query_results([[order]])
        .append_query_results([[item]])
        .append_exec_results([written.clone(), written.clone(), written])
        .into_connection();

    let placed = order_db::place_order(&db, &order_for(&client, wine.id, 2))
        .await
        .unwrap();
    assert_eq!(placed.items.len(), 1);

    let log = db.into_transaction_log();
    let sql = statements(&log);
    assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
    assert!(statement_values(&log, "INSERT INTO `orders`").contains(&&Value::Double(Some(40.0))));
    assert!(
        statement_values(&log, "INSERT INTO `order_items`").contains(&&Value::Double(Some(20.0)))
    );
}

#[tokio::test]
async fn test_order_for_unknown_cuvee_touches_no_stock() {
    let client = user(Roles::Client, "");
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<cuvees::Model>::new()])
        .into_connection();

    let missing = Uuid::new_v4();
    let result = order_db::place_order(&db, &order_for(&client, missing, 1)).await;
    assert!(matches!(result, Err(OrderError::UnknownCuvee(id)) if id == missing));

    let sql = statements(&db.into_transaction_log());
    assert!(!sql.iter().any(|s| s.starts_with("UPDATE")));
    assert!(!sql.iter().any(|s| s == "COMMIT"));
}

// ── Invoices ──

#[actix_web::test]
async fn test_deleting_missing_invoice_is_not_found() {
    let admin = user(Roles::Admin, "");
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[admin.clone()]])
        .append_query_results([Vec::<invoices::Model>::new()])
        .into_connection();
    let app = test_app!(db.clone());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/invoices/{}", Uuid::new_v4()))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(resp).await, "Facture introuvable");

    let sql = statements(&db.into_transaction_log());
    assert!(!sql.iter().any(|s| s.starts_with("DELETE")));
    assert!(!sql.iter().any(|s| s == "COMMIT"));
}

// ── Production steps ──

fn production() -> productions::Model {
    productions::Model {
        id: Uuid::new_v4(),
        name: "Assemblage 2024".into(),
        status: ProductionStatus::InProgress,
        start_date: None,
        end_date: None,
        description: None,
        progress: 0,
        current_step: NOT_STARTED_LABEL.into(),
        created_at: chrono::Utc::now(),
        updated_at: None,
    }
}

fn step_input() -> StepInput {
    StepInput {
        id: None,
        name: "Vendange".into(),
        status: ProductionStatus::Completed,
        start_date: None,
        end_date: None,
        duration: Some(3),
    }
}

#[tokio::test]
async fn test_step_write_locks_the_production_first() {
    let lot = production();
    let step = production_steps::Model {
        id: Uuid::new_v4(),
        production_id: lot.id,
        name: "Vendange".into(),
        status: ProductionStatus::Completed,
        start_date: None,
        end_date: None,
        duration: Some(3),
        created_at: chrono::Utc::now(),
        updated_at: None,
    };
    let written = MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    };
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[lot.clone()]])
        .append_query_results([[step.clone()], [step]])
        .append_exec_results([written.clone(), written])
        .into_connection();

    production_db::insert_step(&db, lot.id, step_input())
        .await
        .unwrap();

    let log = db.into_transaction_log();
    let sql = statements(&log);
    let lock = sql.iter().position(|s| s.contains("FOR UPDATE"));
    let insert = sql
        .iter()
        .position(|s| s.starts_with("INSERT INTO `production_steps`"));
    assert_eq!(lock, Some(1));
    assert!(lock < insert);
    assert!(statement_values(&log, "UPDATE `productions`").contains(&&Value::Int(Some(100))));
}

#[tokio::test]
async fn test_step_write_on_vanished_production_writes_nothing() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<productions::Model>::new()])
        .into_connection();

    let result = production_db::insert_step(&db, Uuid::new_v4(), step_input()).await;
    assert!(matches!(result, Err(DbErr::RecordNotFound(_))));

    let sql = statements(&db.into_transaction_log());
    assert!(!sql.iter().any(|s| s.starts_with("INSERT")));
    assert!(!sql.iter().any(|s| s == "COMMIT"));
}

#[actix_web::test]
async fn test_deleting_missing_step_is_not_found() {
    let admin = user(Roles::Admin, "");
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[admin.clone()]])
        .append_query_results([Vec::<production_steps::Model>::new()])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/productions/{}/steps/{}",
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .insert_header(bearer(&admin))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(message_of(resp).await, "Étape de production introuvable");
}
