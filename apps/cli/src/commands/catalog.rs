//! Public catalog: products and services.

use homecraft_client::{Storefront, Transport};

use crate::error::{CommandError, CommandResult};

pub async fn list_products<T: Transport>(app: &Storefront<T>) -> CommandResult<()> {
    let products = app
        .load_products()
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;

    if products.is_empty() {
        println!("No products yet.");
        return Ok(());
    }

    for product in &products {
        let stock = if product.count_in_stock > 0 {
            format!("{} in stock", product.count_in_stock)
        } else {
            "out of stock".to_string()
        };
        println!(
            "{:<26} {:<32} {:>12}  {}",
            product.id,
            product.name,
            app.config().format_money(product.price),
            stock
        );
    }
    Ok(())
}

pub async fn show_product<T: Transport>(app: &Storefront<T>, id: &str) -> CommandResult<()> {
    let product = app
        .load_product(id)
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;

    println!("{}", product.name);
    println!("  id:        {}", product.id);
    println!("  price:     {}", app.config().format_money(product.price));
    println!("  category:  {}", product.category);
    println!("  in stock:  {}", product.count_in_stock);
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}

pub async fn list_services<T: Transport>(app: &Storefront<T>) -> CommandResult<()> {
    let services = app
        .load_services()
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;

    if services.is_empty() {
        println!("No services yet.");
        return Ok(());
    }

    for service in &services {
        println!(
            "{:<26} {:<32} {:>12} {}",
            service.id,
            service.title,
            app.config().format_money(service.price),
            service.unit
        );
    }
    Ok(())
}

pub async fn show_service<T: Transport>(app: &Storefront<T>, id: &str) -> CommandResult<()> {
    let service = app
        .load_service(id)
        .await
        .map_err(|e| CommandError::rejected(e, app.services().error()))?;

    println!("{}", service.title);
    println!("  id:     {}", service.id);
    println!(
        "  price:  {} {}",
        app.config().format_money(service.price),
        service.unit
    );
    if !service.description.is_empty() {
        println!();
        println!("{}", service.description);
    }
    Ok(())
}
