//! Interactive storefront session.

use std::sync::Arc;

use abyssinia_commerce::catalog::{Catalog, Category};
use abyssinia_commerce::checkout::{CheckoutStep, PaymentMethod, ShippingDetails};
use abyssinia_commerce::error::CommerceError;
use abyssinia_commerce::session::{Storefront, StorefrontEvent};
use abyssinia_store::{KvBackend, KvOrderStore, MemoryBackend};
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use super::catalog::print_product;
use super::place::{log_events, print_confirmation, submit};
use super::ShopArgs;
use crate::context::{AppStore, Context};

/// Run the shop command.
pub async fn run(args: ShopArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let store = if args.memory {
        let backend: Box<dyn KvBackend> = Box::new(MemoryBackend::new());
        Arc::new(KvOrderStore::with_options(backend, ctx.config.store.options()))
    } else {
        ctx.open_store().await?
    };
    let mut shop = Storefront::new(store);

    ctx.output.header("Abyssinia Direct");
    ctx.output.info("Handmade goods from Ethiopia, shipped by Ethiopian Airlines Cargo.");

    loop {
        let cart_label = format!("View cart ({})", shop.cart().item_count());
        let choice = Select::new()
            .with_prompt("What would you like to do?")
            .items(&["Browse products", cart_label.as_str(), "Checkout", "Quit"])
            .default(0)
            .interact()?;

        match choice {
            0 => browse(&catalog, &mut shop, ctx)?,
            1 => edit_cart(&mut shop, ctx)?,
            2 => checkout(&mut shop, ctx).await?,
            _ => break,
        }
        log_events(&mut shop);
    }

    Ok(())
}

fn browse(catalog: &Catalog, shop: &mut Storefront<AppStore>, ctx: &Context) -> Result<()> {
    let mut categories = vec!["All".to_string()];
    categories.extend(Category::ALL.iter().map(|c| c.display_name().to_string()));
    let picked = Select::new()
        .with_prompt("Category")
        .items(&categories)
        .default(0)
        .interact()?;
    let category = picked.checked_sub(1).and_then(|i| Category::ALL.get(i).copied());

    let query = Input::<String>::new()
        .with_prompt("Search (leave empty for everything)")
        .allow_empty(true)
        .interact_text()?;

    let products = catalog.search(&query, category);
    if products.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    let mut items: Vec<String> = products
        .iter()
        .map(|p| {
            let stock = if p.in_stock { "" } else { " (sold out)" };
            format!("{:<28} {:>10}{}", p.name, p.price.to_string(), stock)
        })
        .collect();
    items.push("← Back".to_string());

    let picked = Select::new()
        .with_prompt("Product")
        .items(&items)
        .default(0)
        .interact()?;
    let Some(product) = products.get(picked) else {
        return Ok(());
    };

    print_product(product, ctx);
    if !product.in_stock {
        ctx.output.warn("This item is sold out.");
        return Ok(());
    }

    if Confirm::new().with_prompt("Add to cart?").default(true).interact()? {
        shop.add_to_cart(product)?;
        if shop.drain_events().contains(&StorefrontEvent::CartOpened) {
            ctx.output.header("Your cart");
            ctx.output.cart(shop.cart(), &shop.quote());
        }
    }
    Ok(())
}

fn edit_cart(shop: &mut Storefront<AppStore>, ctx: &Context) -> Result<()> {
    loop {
        ctx.output.header("Your cart");
        ctx.output.cart(shop.cart(), &shop.quote());
        if shop.cart().is_empty() {
            return Ok(());
        }

        let mut items: Vec<String> = shop
            .cart()
            .lines()
            .iter()
            .map(|l| format!("{} × {}", l.quantity, l.product.name))
            .collect();
        items.push("← Back".to_string());

        let picked = Select::new()
            .with_prompt("Edit a line")
            .items(&items)
            .default(0)
            .interact()?;
        let Some(id) = shop.cart().lines().get(picked).map(|l| l.product.id.clone()) else {
            return Ok(());
        };

        let action = Select::new()
            .items(&["Add one", "Remove one", "Remove from cart", "Cancel"])
            .default(0)
            .interact()?;
        match action {
            0 => {
                shop.update_quantity(&id, 1);
            }
            1 => {
                shop.update_quantity(&id, -1);
            }
            2 => {
                shop.remove_from_cart(&id);
            }
            _ => {}
        }
    }
}

async fn checkout(shop: &mut Storefront<AppStore>, ctx: &Context) -> Result<()> {
    if let Err(e) = shop.open_checkout() {
        if matches!(e, CommerceError::EmptyCart) {
            ctx.output.warn("Add something to your cart first.");
            return Ok(());
        }
        return Err(e.into());
    }

    loop {
        let Some(step) = shop.checkout().map(|f| f.step()) else {
            return Ok(());
        };
        ctx.output.step(step);

        match step {
            CheckoutStep::Shipping => {
                let previous = shop.checkout().and_then(|f| f.shipping_details()).cloned();
                let details = prompt_shipping(previous.unwrap_or_default())?;
                if let Err(e) = shop.submit_shipping(details) {
                    if !e.is_recoverable() {
                        return Err(e.into());
                    }
                    ctx.output.error(&e.to_string());
                    if !Confirm::new().with_prompt("Try again?").default(true).interact()? {
                        shop.close_checkout();
                    }
                }
            }
            CheckoutStep::Payment => {
                ctx.output.cart(shop.cart(), &shop.quote());

                let methods = PaymentMethod::ALL;
                let labels: Vec<&str> = methods.iter().map(|m| m.display_name()).collect();
                let picked = Select::new()
                    .with_prompt("Payment method")
                    .items(&labels)
                    .default(0)
                    .interact()?;
                let method = methods[picked.min(methods.len() - 1)];
                shop.select_payment_method(method)?;
                if let Some(instructions) = method.instructions() {
                    ctx.output.info(instructions);
                }

                let action = Select::new()
                    .items(&["Place order", "← Back to shipping", "Cancel checkout"])
                    .default(0)
                    .interact()?;
                match action {
                    0 => match submit(shop, ctx).await {
                        Ok(order) => print_confirmation(&order, ctx),
                        Err(e) if e.is_recoverable() => {
                            ctx.output.error(&e.to_string());
                            ctx.output.info("Your cart is unchanged. You can try again.");
                        }
                        Err(e) => return Err(e.into()),
                    },
                    1 => {
                        shop.back()?;
                    }
                    _ => {
                        shop.close_checkout();
                    }
                }
            }
            CheckoutStep::Confirmation => {
                ctx.output.info("Thank you for shopping with Abyssinia Direct.");
                shop.close_checkout();
            }
        }
    }
}

fn prompt_shipping(previous: ShippingDetails) -> Result<ShippingDetails> {
    let field = |prompt: &str, initial: &str| -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?)
    };

    Ok(ShippingDetails {
        first_name: field("First name", &previous.first_name)?,
        last_name: field("Last name", &previous.last_name)?,
        email: field("Email", &previous.email)?,
        phone: field("Phone", &previous.phone)?,
        address: field("Street address", &previous.address)?,
        city: field("City", &previous.city)?,
        postal_code: field("Postal code", &previous.postal_code)?,
        country: field("Country", &previous.country)?,
    })
}
