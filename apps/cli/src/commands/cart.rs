//! Cart and checkout.

use homecraft_client::{Storefront, Transport};

use crate::error::{CommandError, CommandResult};

pub fn show<T: Transport>(app: &Storefront<T>) -> CommandResult<()> {
    let cart = app.cart().snapshot();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    let config = app.config();
    for item in cart.items() {
        println!(
            "{:<26} {:<32} {:>4} x {:>10} = {:>12}",
            item.product_id,
            item.name,
            item.quantity,
            config.format_money(item.price),
            config.format_money(item.line_total())
        );
    }
    println!(
        "{} item(s), subtotal {}",
        cart.item_count(),
        config.format_money(cart.subtotal())
    );
    Ok(())
}

pub async fn add<T: Transport>(app: &Storefront<T>, product_id: &str, qty: u32) -> CommandResult<()> {
    let item = app
        .add_to_cart(product_id, qty)
        .await
        .map_err(|e| CommandError::rejected(e, app.products().error()))?;

    println!("{} x {} in cart", item.quantity, item.name);
    Ok(())
}

pub fn set_quantity<T: Transport>(app: &Storefront<T>, product_id: &str, qty: u32) -> CommandResult<()> {
    if app.cart().set_quantity(product_id, qty)? {
        println!("{product_id} now x {qty}");
    } else {
        println!("{product_id} is not in the cart");
    }
    Ok(())
}

pub fn remove<T: Transport>(app: &Storefront<T>, product_id: &str) -> CommandResult<()> {
    if app.cart().remove(product_id) {
        println!("Removed {product_id}");
    } else {
        println!("{product_id} is not in the cart");
    }
    Ok(())
}

pub fn clear<T: Transport>(app: &Storefront<T>) -> CommandResult<()> {
    app.cart().clear();
    println!("Cart cleared.");
    Ok(())
}

/// Places the order and shows it; the cart is emptied by the container on
/// success and left untouched on failure.
pub async fn checkout<T: Transport>(app: &Storefront<T>, address: &str) -> CommandResult<()> {
    let total = app.cart().totals().subtotal;
    let order = app
        .checkout(address)
        .await
        .map_err(|e| CommandError::rejected(e, app.orders().error()))?;

    println!(
        "Order {} placed: {} cash on delivery",
        order.id,
        app.config().format_money(total)
    );
    app.orders().reset();
    Ok(())
}
