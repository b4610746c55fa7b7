//! Merchant order history commands.

use abyssinia_auth::{AuthError, MerchantDashboard};
use abyssinia_commerce::checkout::{Order, OrderStore};
use abyssinia_commerce::ids::OrderId;
use anyhow::{bail, Result};
use dialoguer::{Confirm, Password};

use super::{OrdersArgs, OrdersCommand};
use crate::context::{AppStore, Context};
use crate::output::{status_badge, Output};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let dashboard = unlock(args.pin, ctx).await?;

    match args.command.unwrap_or(OrdersCommand::List { limit: None }) {
        OrdersCommand::List { limit } => list_orders(&dashboard, limit, ctx).await,
        OrdersCommand::Show { id } => show_order(&dashboard, &id, ctx).await,
        OrdersCommand::Clear { yes } => clear_orders(&dashboard, yes, ctx).await,
    }
}

async fn unlock(pin: Option<String>, ctx: &Context) -> Result<MerchantDashboard<AppStore>> {
    if pin.is_none() && ctx.output.is_json() {
        bail!("--pin is required with --json");
    }

    let store = ctx.open_store().await?;
    let mut dashboard = MerchantDashboard::new(ctx.merchant_gate(), store);
    match pin {
        Some(pin) => match dashboard.unlock(&pin) {
            Ok(()) => {}
            Err(AuthError::IncorrectSecret) => bail!("Incorrect PIN"),
            Err(e) => return Err(e.into()),
        },
        None => prompt_until_unlocked(&mut dashboard, &ctx.output, || {
            Ok(Password::new().with_prompt("Merchant PIN").interact()?)
        })?,
    }
    Ok(dashboard)
}

/// Ask for the PIN until the gate opens. A wrong PIN is reported and the
/// prompt starts over empty.
fn prompt_until_unlocked<S: OrderStore>(
    dashboard: &mut MerchantDashboard<S>,
    output: &Output,
    mut prompt: impl FnMut() -> Result<String>,
) -> Result<()> {
    loop {
        let attempt = prompt()?;
        match dashboard.unlock(&attempt) {
            Ok(()) => return Ok(()),
            Err(AuthError::IncorrectSecret) if dashboard.gate().last_attempt_incorrect() => {
                output.error("Incorrect PIN, try again.");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn list_orders(
    dashboard: &MerchantDashboard<AppStore>,
    limit: Option<usize>,
    ctx: &Context,
) -> Result<()> {
    let spinner = ctx.output.spinner("Loading orders...");
    let result = dashboard.orders().await;
    spinner.finish_and_clear();

    let mut orders = result?;
    if let Some(limit) = limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Order history");
    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return Ok(());
    }

    let widths = [10, 17, 24, 6, 12, 10];
    ctx.output
        .table_row(&["REFERENCE", "DATE", "CUSTOMER", "ITEMS", "TOTAL", "STATUS"], &widths);
    for order in &orders {
        ctx.output.table_row(
            &[
                order.id().as_str(),
                &order.created_at().format("%Y-%m-%d %H:%M").to_string(),
                &order.shipping_details().full_name(),
                &order.item_count().to_string(),
                &order.total().to_string(),
                &status_badge(order.status()),
            ],
            &widths,
        );
    }
    ctx.output.info(&format!("{} order(s)", orders.len()));
    Ok(())
}

async fn show_order(
    dashboard: &MerchantDashboard<AppStore>,
    id: &str,
    ctx: &Context,
) -> Result<()> {
    let Some(order) = dashboard.order(&OrderId::new(id)).await? else {
        bail!("Order not found: {}", id);
    };

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    print_order(&order, ctx);
    Ok(())
}

fn print_order(order: &Order, ctx: &Context) {
    let details = order.shipping_details();

    ctx.output.header(&format!("Order {}", order.id()));
    ctx.output.kv("Placed", &order.created_at().to_rfc2822());
    ctx.output.kv("Status", &status_badge(order.status()));
    ctx.output.kv("Payment", order.payment_method().display_name());

    ctx.output.info("");
    ctx.output.info("Items:");
    for item in order.items() {
        ctx.output.list_item(&format!(
            "{} × {} @ {} = {}",
            item.quantity,
            item.name,
            item.unit_price,
            item.total_price()
        ));
    }

    ctx.output.info("");
    ctx.output.kv("Subtotal", &order.subtotal().to_string());
    ctx.output.kv("Shipping", &order.shipping_cost().to_string());
    ctx.output.kv("Import duties", &order.duties().to_string());
    ctx.output.kv("Total", &order.total().to_string());

    ctx.output.info("");
    ctx.output.kv("Customer", &details.full_name());
    ctx.output.kv("Email", &details.email);
    ctx.output.kv("Phone", &details.phone);
    ctx.output.kv("Ship to", &details.one_line_address());
}

async fn clear_orders(
    dashboard: &MerchantDashboard<AppStore>,
    yes: bool,
    ctx: &Context,
) -> Result<()> {
    if !yes {
        if ctx.output.is_json() {
            bail!("--yes is required with --json");
        }
        let confirmed = Confirm::new()
            .with_prompt("Erase the entire order history? This cannot be undone")
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled.");
            return Ok(());
        }
    }

    dashboard.clear_history().await?;
    ctx.output.success("Order history cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use abyssinia_auth::AccessGate;
    use abyssinia_store::{KvOrderStore, MemoryBackend};

    use super::*;

    fn dashboard() -> MerchantDashboard<KvOrderStore<MemoryBackend>> {
        let store = Arc::new(KvOrderStore::new(MemoryBackend::new()));
        MerchantDashboard::new(AccessGate::new("2468"), store)
    }

    #[test]
    fn test_wrong_pin_prompts_again() {
        let mut dashboard = dashboard();
        let mut attempts = vec!["1111", "0000", "2468"].into_iter();
        let mut asked = 0;

        prompt_until_unlocked(&mut dashboard, &Output::new(false, true), || {
            asked += 1;
            Ok(attempts.next().unwrap().to_string())
        })
        .unwrap();

        assert_eq!(asked, 3);
        assert!(dashboard.gate().is_unlocked());
        assert!(!dashboard.gate().last_attempt_incorrect());
    }

    #[test]
    fn test_prompt_failure_stops_retrying() {
        let mut dashboard = dashboard();
        let mut asked = 0;

        let result = prompt_until_unlocked(&mut dashboard, &Output::new(false, true), || {
            asked += 1;
            if asked == 1 {
                Ok("9999".to_string())
            } else {
                bail!("input closed")
            }
        });

        assert!(result.is_err());
        assert_eq!(asked, 2);
        assert!(!dashboard.gate().is_unlocked());
    }
}
