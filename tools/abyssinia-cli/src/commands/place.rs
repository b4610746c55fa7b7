//! Headless order placement.

use abyssinia_commerce::checkout::{Order, ShippingDetails};
use abyssinia_commerce::error::CommerceError;
use abyssinia_commerce::ids::ProductId;
use abyssinia_commerce::session::{Storefront, StorefrontEvent};
use anyhow::{bail, Context as _, Result};
use tracing::debug;

use super::PlaceArgs;
use crate::context::{AppStore, Context};

/// Run the place command.
pub async fn run(args: PlaceArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let items = args
        .items
        .iter()
        .map(|s| parse_item(s))
        .collect::<Result<Vec<_>>>()?;

    let store = ctx.open_store().await?;
    let mut shop = Storefront::new(store);

    for (id, quantity) in &items {
        let product = catalog.get(id)?;
        shop.add_to_cart(product)
            .with_context(|| format!("Cannot add {}", id))?;
        if *quantity > 1 {
            shop.update_quantity(id, i64::from(*quantity) - 1);
        }
    }

    ctx.output.header("Order summary");
    ctx.output.cart(shop.cart(), &shop.quote());

    let details = ShippingDetails {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        city: args.city,
        postal_code: args.postal_code,
        country: args.country,
    };

    shop.open_checkout()?;
    shop.submit_shipping(details)?;
    shop.select_payment_method(args.payment.into())?;

    let order = submit(&mut shop, ctx).await?;
    log_events(&mut shop);

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }
    print_confirmation(&order, ctx);
    Ok(())
}

/// Place the order behind a spinner.
pub async fn submit(
    shop: &mut Storefront<AppStore>,
    ctx: &Context,
) -> Result<Order, CommerceError> {
    let spinner = ctx.output.spinner("Placing order...");
    let result = shop.submit_payment().await;
    spinner.finish_and_clear();
    result
}

/// Send queued session events to the debug log.
pub fn log_events(shop: &mut Storefront<AppStore>) {
    for event in shop.drain_events() {
        match event {
            StorefrontEvent::CheckoutFailed { message } => debug!(%message, "checkout failed"),
            other => debug!(event = ?other, "storefront event"),
        }
    }
}

/// Print the confirmation screen.
pub fn print_confirmation(order: &Order, ctx: &Context) {
    ctx.output.success(&format!("Order {} placed", order.id()));
    ctx.output.kv("Total", &order.total().to_string());
    ctx.output.kv("Payment", order.payment_method().display_name());
    ctx.output.kv("Ship to", &order.shipping_details().one_line_address());
    if let Some(instructions) = order.payment_method().instructions() {
        ctx.output.info("");
        ctx.output.info(instructions);
    }
}

/// Parse `id` or `id:quantity`.
pub fn parse_item(arg: &str) -> Result<(ProductId, u32)> {
    let (id, quantity) = match arg.rsplit_once(':') {
        Some((id, qty)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", arg))?;
            (id, qty)
        }
        None => (arg, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("Missing product ID in '{}'", arg);
    }
    if quantity == 0 {
        bail!("Quantity must be at least 1 in '{}'", arg);
    }
    Ok((ProductId::new(id), quantity))
}
