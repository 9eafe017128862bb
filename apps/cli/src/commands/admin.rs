//! Admin console: catalog mutations.
//!
//! Every command here runs the admin route guard before anything else, so
//! an anonymous or non-admin session is turned away without a request.

use homecraft_client::{Storefront, Transport};
use homecraft_core::{Money, ProductDraft, ServiceDraft};
use tracing::info;

use crate::cli::{ProductFields, ServiceFields};
use crate::error::{CommandError, CommandResult};

pub const ADMIN_PRODUCTS_PATH: &str = "/admin/products";
pub const ADMIN_SERVICES_PATH: &str = "/admin/services";

fn require_admin<T: Transport>(app: &Storefront<T>, requested: &str) -> CommandResult<()> {
    CommandError::guard(app.session().admin_route(requested))
}

// =============================================================================
// Products
// =============================================================================

fn apply_product_fields(draft: &mut ProductDraft, fields: ProductFields) {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(price) = fields.price {
        draft.price = Money::new(price);
    }
    if let Some(image) = fields.image {
        draft.image = image;
    }
    if let Some(category) = fields.category {
        draft.category = category;
    }
    if let Some(stock) = fields.stock {
        draft.count_in_stock = stock;
    }
}

pub async fn create_product<T: Transport>(
    app: &Storefront<T>,
    fields: ProductFields,
) -> CommandResult<()> {
    require_admin(app, ADMIN_PRODUCTS_PATH)?;
    if fields.price.is_none() {
        return Err(CommandError::validation("price is required"));
    }

    let mut draft = ProductDraft::default();
    apply_product_fields(&mut draft, fields);

    let product = app
        .create_product(&draft)
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;
    app.products().reset_success();

    info!(product_id = %product.id, "Product created");
    println!("Created {} ({})", product.name, product.id);
    Ok(())
}

/// Loads the current product, overlays the given flags, sends the result.
pub async fn update_product<T: Transport>(
    app: &Storefront<T>,
    id: &str,
    fields: ProductFields,
) -> CommandResult<()> {
    require_admin(app, ADMIN_PRODUCTS_PATH)?;

    let current = app
        .load_product(id)
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;
    let mut draft = ProductDraft::from(&current);
    apply_product_fields(&mut draft, fields);

    let product = app
        .update_product(id, &draft)
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;
    app.products().reset_success();

    println!(
        "Updated {} ({}) at {}",
        product.name,
        product.id,
        app.config().format_money(product.price)
    );
    Ok(())
}

pub async fn delete_product<T: Transport>(app: &Storefront<T>, id: &str) -> CommandResult<()> {
    require_admin(app, ADMIN_PRODUCTS_PATH)?;

    app.delete_product(id)
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;
    app.products().reset_success();

    println!("Deleted product {id}");
    Ok(())
}

// =============================================================================
// Services
// =============================================================================

fn apply_service_fields(draft: &mut ServiceDraft, fields: ServiceFields) {
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(price) = fields.price {
        draft.price = Money::new(price);
    }
    if let Some(unit) = fields.unit {
        draft.unit = unit;
    }
    if let Some(image) = fields.image {
        draft.image = image;
    }
}

pub async fn create_service<T: Transport>(
    app: &Storefront<T>,
    fields: ServiceFields,
) -> CommandResult<()> {
    require_admin(app, ADMIN_SERVICES_PATH)?;
    if fields.price.is_none() {
        return Err(CommandError::validation("price is required"));
    }

    let mut draft = ServiceDraft::default();
    apply_service_fields(&mut draft, fields);

    let service = app
        .create_service(&draft)
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;
    app.services().reset_success();

    info!(service_id = %service.id, "Service created");
    println!("Created {} ({})", service.title, service.id);
    Ok(())
}

pub async fn update_service<T: Transport>(
    app: &Storefront<T>,
    id: &str,
    fields: ServiceFields,
) -> CommandResult<()> {
    require_admin(app, ADMIN_SERVICES_PATH)?;

    let current = app
        .load_service(id)
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;
    let mut draft = ServiceDraft::from(&current);
    apply_service_fields(&mut draft, fields);

    let service = app
        .update_service(id, &draft)
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;
    app.services().reset_success();

    println!("Updated {} ({})", service.title, service.id);
    Ok(())
}

pub async fn delete_service<T: Transport>(app: &Storefront<T>, id: &str) -> CommandResult<()> {
    require_admin(app, ADMIN_SERVICES_PATH)?;

    app.delete_service(id)
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;
    app.services().reset_success();

    println!("Deleted service {id}");
    Ok(())
}
