pub mod admin_messages;
pub mod auth;
pub mod cuvees;
pub mod invoices;
pub mod orders;
pub mod partenaires;
pub mod productions;
pub mod settings;
pub mod stocks;
pub mod users;
pub mod vineyards;

use actix_web::web;

use crate::error::ApiError;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies and path segments answer 400 with the usual `{message}` body.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );

    // ── Auth routes ──
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/register", web::post().to(auth::register))
            .route("/me", web::get().to(auth::me)),
    );

    // ── User routes ──
    cfg.service(
        web::resource("/users")
            .route(web::get().to(users::get_users))
            .route(web::post().to(users::create_user)),
    );
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user))
            .route(web::delete().to(users::delete_user)),
    );
    cfg.service(web::resource("/password/{id}").route(web::put().to(users::change_password)));

    // ── Catalogue routes ──
    cfg.service(
        web::scope("/cuvees")
            .route("", web::get().to(cuvees::get_cuvees))
            .route("", web::post().to(cuvees::create_cuvee))
            .route("/{id}", web::get().to(cuvees::get_cuvee))
            .route("/{id}", web::put().to(cuvees::update_cuvee))
            .route("/{id}", web::delete().to(cuvees::delete_cuvee)),
    );
    cfg.service(
        web::scope("/stocks")
            .route("", web::get().to(stocks::get_stocks))
            .route("", web::post().to(stocks::create_stock))
            .route("/alerts", web::get().to(stocks::get_stock_alerts))
            .route("/{id}", web::get().to(stocks::get_stock))
            .route("/{id}", web::put().to(stocks::update_stock))
            .route("/{id}", web::delete().to(stocks::delete_stock)),
    );
    cfg.service(
        web::scope("/vineyards")
            .route("", web::get().to(vineyards::get_vineyards))
            .route("", web::post().to(vineyards::create_vineyard))
            .route("/{id}", web::get().to(vineyards::get_vineyard))
            .route("/{id}", web::put().to(vineyards::update_vineyard))
            .route("/{id}", web::delete().to(vineyards::delete_vineyard)),
    );

    // ── Order routes ──
    cfg.service(
        web::scope("/orders")
            .route("", web::get().to(orders::get_orders))
            .route("", web::post().to(orders::create_order))
            .route("", web::put().to(orders::update_order_status))
            // GET takes a client id, DELETE an order id.
            .route("/{id}", web::get().to(orders::get_client_orders))
            .route("/{id}", web::delete().to(orders::delete_order))
            .route("/{id}/items", web::get().to(orders::get_items_of_order)),
    );
    cfg.service(web::resource("/checkout").route(web::post().to(orders::checkout)));
    cfg.service(
        web::scope("/order_items")
            .route("", web::get().to(orders::get_order_items))
            .route(
                "/{client_id}/{order_id}",
                web::post().to(orders::create_order_item),
            ),
    );

    // ── Invoice routes ──
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(invoices::get_invoices))
            .route("", web::post().to(invoices::create_invoice))
            .route("/{id}", web::get().to(invoices::get_invoice))
            .route("/{id}", web::put().to(invoices::update_invoice))
            .route("/{id}", web::delete().to(invoices::delete_invoice))
            .route("/{id}/status", web::patch().to(invoices::update_invoice_status)),
    );
    cfg.service(web::resource("/invoice/items").route(web::get().to(invoices::get_invoice_items)));

    // ── Production routes ──
    cfg.service(
        web::scope("/productions")
            .route("", web::get().to(productions::get_productions))
            .route("", web::post().to(productions::create_production))
            .route("/{id}", web::get().to(productions::get_production))
            .route("/{id}", web::put().to(productions::update_production))
            .route("/{id}", web::delete().to(productions::delete_production))
            .route("/{id}/steps", web::get().to(productions::get_steps))
            .route("/{id}/steps", web::post().to(productions::create_step))
            .route("/{id}/steps/{step_id}", web::put().to(productions::update_step))
            .route("/{id}/steps/{step_id}", web::delete().to(productions::delete_step)),
    );
    cfg.service(
        web::resource("/production/steps").route(web::get().to(productions::get_all_steps)),
    );

    // ── Partner countries ──
    cfg.service(
        web::scope("/partenaire")
            .route("", web::get().to(partenaires::get_partenaires))
            .route("", web::post().to(partenaires::create_partenaire))
            .route("/{code}", web::delete().to(partenaires::delete_partenaire)),
    );
    cfg.service(web::resource("/geolocation").route(web::get().to(partenaires::geolocate)));

    // ── Settings ──
    cfg.service(
        web::scope("/settings")
            .route("", web::get().to(settings::get_settings))
            .route("", web::put().to(settings::update_settings))
            .route("/{user_id}", web::get().to(settings::get_user_settings))
            .route("/{user_id}", web::post().to(settings::save_user_settings)),
    );

    // ── Admin inbox ──
    cfg.service(
        web::scope("/admin_messages")
            .route("", web::get().to(admin_messages::get_messages))
            .route("", web::post().to(admin_messages::create_message))
            .route("", web::delete().to(admin_messages::delete_all_messages))
            .route("/read_all", web::patch().to(admin_messages::mark_all_read))
            .route("/{user_id}", web::post().to(admin_messages::create_user_message))
            .route("/{id}", web::delete().to(admin_messages::delete_message))
            .route("/{id}/read", web::patch().to(admin_messages::mark_read)),
    );
}
