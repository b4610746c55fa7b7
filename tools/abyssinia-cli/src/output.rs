//! Output formatting for the CLI.

use std::time::Duration;

use abyssinia_commerce::cart::Cart;
use abyssinia_commerce::checkout::{CheckoutStep, OrderStatus};
use abyssinia_commerce::pricing::PriceQuote;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print the checkout step indicator.
    pub fn step(&self, step: CheckoutStep) {
        if self.json {
            return;
        }
        let labels: Vec<String> = [
            CheckoutStep::Shipping,
            CheckoutStep::Payment,
            CheckoutStep::Confirmation,
        ]
        .iter()
        .map(|s| {
            let label = format!("{}. {}", s.number(), s.display_name());
            if *s == step {
                style(label).bold().cyan().to_string()
            } else if s.number() < step.number() {
                style(label).green().to_string()
            } else {
                style(label).dim().to_string()
            }
        })
        .collect();
        println!("\n{}", labels.join(&style(" › ").dim().to_string()));
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize + ?Sized>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print cart lines and the price breakdown.
    pub fn cart(&self, cart: &Cart, quote: &PriceQuote) {
        if self.json {
            return;
        }
        if cart.is_empty() {
            self.info("Your cart is empty.");
            return;
        }
        for line in cart.lines() {
            self.table_row(
                &[
                    &line.product.name,
                    &format!("{} × {}", line.quantity, line.unit_price()),
                    &line.total_price().to_string(),
                ],
                &[28, 16, 12],
            );
        }
        println!();
        self.kv("Subtotal", &quote.subtotal.to_string());
        self.kv("Shipping (Ethiopian Airlines Cargo)", &quote.shipping_cost.to_string());
        self.kv("Import duties", &quote.duties.to_string());
        self.kv("Total", &style(quote.total).bold().to_string());
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Status badge for order states.
pub fn status_badge(status: OrderStatus) -> String {
    match status {
        OrderStatus::Pending => style(status.display_name()).yellow().to_string(),
        _ => status.display_name().to_string(),
    }
}
