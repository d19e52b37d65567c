pub mod admin_messages;
pub mod cuvees;
pub mod invoice_items;
pub mod invoices;
pub mod order_items;
pub mod orders;
pub mod partenaires;
pub mod production_steps;
pub mod productions;
pub mod settings;
pub mod stocks;
pub mod user_settings;
pub mod users;
pub mod vineyards;
