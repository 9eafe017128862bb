//! Command handlers.
//!
//! Each handler takes the [`Storefront`] by reference, dispatches one
//! operation and prints what changed. Handlers are generic over the
//! transport so tests can drive them without a backend.

mod admin;
mod auth;
mod booking;
mod cart;
mod catalog;

use homecraft_client::{Storefront, Transport};

use crate::cli::{CartAction, Commands, ProductAction, ServiceAction};
use crate::error::CommandResult;

pub use admin::{ADMIN_PRODUCTS_PATH, ADMIN_SERVICES_PATH};

/// Routes a parsed command to its handler.
pub async fn dispatch<T: Transport>(app: &Storefront<T>, command: Commands) -> CommandResult<()> {
    match command {
        Commands::Products { action } => match action {
            ProductAction::List => catalog::list_products(app).await,
            ProductAction::Show { id } => catalog::show_product(app, &id).await,
            ProductAction::Create(fields) => admin::create_product(app, fields).await,
            ProductAction::Update { id, fields } => admin::update_product(app, &id, fields).await,
            ProductAction::Delete { id } => admin::delete_product(app, &id).await,
        },
        Commands::Services { action } => match action {
            ServiceAction::List => catalog::list_services(app).await,
            ServiceAction::Show { id } => catalog::show_service(app, &id).await,
            ServiceAction::Create(fields) => admin::create_service(app, fields).await,
            ServiceAction::Update { id, fields } => admin::update_service(app, &id, fields).await,
            ServiceAction::Delete { id } => admin::delete_service(app, &id).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show(app),
            CartAction::Add { product_id, qty } => cart::add(app, &product_id, qty).await,
            CartAction::Qty { product_id, qty } => cart::set_quantity(app, &product_id, qty),
            CartAction::Remove { product_id } => cart::remove(app, &product_id),
            CartAction::Clear => cart::clear(app),
        },
        Commands::Login {
            email,
            password,
            from,
        } => auth::login(app, email, password, from.as_deref()).await,
        Commands::Register {
            name,
            email,
            password,
        } => auth::register(app, name, email, password).await,
        Commands::Logout => auth::logout(app),
        Commands::Whoami => auth::whoami(app),
        Commands::Checkout { address } => cart::checkout(app, &address).await,
        Commands::Book {
            service_id,
            date,
            address,
            notes,
        } => booking::book(app, &service_id, date, &address, notes).await,
    }
}
