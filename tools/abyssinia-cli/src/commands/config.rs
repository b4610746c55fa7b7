//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, StoreBackendKind, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

/// The config with the merchant PIN hidden.
fn redacted(config: &CliConfig) -> CliConfig {
    let mut config = config.clone();
    config.merchant.pin = "*".repeat(config.merchant.pin.chars().count());
    config
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = redacted(&ctx.config);

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[store]");
    let backend = match config.store.backend {
        StoreBackendKind::File => "file",
        StoreBackendKind::Memory => "memory",
    };
    ctx.output.kv("backend", backend);
    if config.store.backend == StoreBackendKind::File {
        ctx.output.kv(
            "dir",
            &ctx.resolve_path(&config.store.dir).display().to_string(),
        );
    }
    ctx.output
        .kv("save_latency_ms", &config.store.save_latency_ms.to_string());
    ctx.output
        .kv("list_latency_ms", &config.store.list_latency_ms.to_string());
    ctx.output.kv("strict_reads", &config.store.strict_reads.to_string());

    ctx.output.info("");
    ctx.output.info("[merchant]");
    ctx.output.kv("pin", &config.merchant.pin);

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv(
        "path",
        config.catalog.path.as_deref().unwrap_or("(built-in collection)"),
    );

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_hides_pin() {
        let config = CliConfig::default();
        let shown = redacted(&config);
        assert_eq!(shown.merchant.pin, "****");
        assert_eq!(shown.store, config.store);
    }
}
