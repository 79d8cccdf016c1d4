//! Config subcommand handlers.

use dialoguer::{Input, Select};
use strum::VariantNames;

use catalog_config::{self as config, Config, Environment, TokenStore};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash, yes_no};

use super::util::prompt_err;

fn config_detail(cfg: &Config) -> String {
    let effective = cfg
        .base_url()
        .map_or_else(|e| format!("invalid ({e})"), |u| u.to_string());
    detail_lines(&[
        ("Config file", config::config_path().display().to_string()),
        ("API URL", effective),
        ("Environment", cfg.environment.to_string()),
        ("Timeout", or_dash(cfg.timeout_secs.map(|s| format!("{s}s")))),
        ("Stale after", cfg.stale_after.clone()),
        ("Token store", cfg.token_store.to_string()),
        ("Insecure TLS", yes_no(cfg.insecure)),
        ("CA cert", or_dash(cfg.ca_cert.as_ref().map(|p| p.display().to_string()))),
    ])
}

fn parse_flag(key: &str, value: &str) -> Result<bool, CliError> {
    value
        .parse()
        .map_err(|_| CliError::validation(key, "must be 'true' or 'false'"))
}

fn one_of(key: &str, variants: &[&str]) -> CliError {
    CliError::validation(key, format!("must be one of: {}", variants.join(", ")))
}

/// Apply `key = value` to `cfg`. Empty values unset optional keys.
fn set_key(cfg: &mut Config, key: &str, value: String) -> Result<(), CliError> {
    let optional = |v: String| (!v.trim().is_empty()).then_some(v);
    match key {
        "api_url" | "api-url" => cfg.api_url = optional(value),
        "environment" => {
            cfg.environment = value
                .parse()
                .map_err(|_| one_of("environment", Environment::VARIANTS))?;
        }
        "timeout_secs" | "timeout-secs" | "timeout" => {
            cfg.timeout_secs = optional(value)
                .map(|v| v.parse())
                .transpose()
                .map_err(|_| CliError::validation("timeout_secs", "must be a number (seconds)"))?;
        }
        "stale_after" | "stale-after" => cfg.stale_after = value,
        "token_store" | "token-store" => {
            cfg.token_store = value
                .parse()
                .map_err(|_| one_of("token_store", TokenStore::VARIANTS))?;
        }
        "insecure" => cfg.insecure = parse_flag("insecure", &value)?,
        "ca_cert" | "ca-cert" => cfg.ca_cert = optional(value).map(Into::into),
        other => {
            return Err(CliError::validation(
                other,
                "unknown config key. Valid keys: api_url, environment, timeout_secs, \
                 stale_after, token_store, insecure, ca_cert",
            ));
        }
    }
    // Reject values the runtime would fail on later.
    cfg.to_catalog_config()?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, config_detail, |c| {
                c.base_url().map(|u| u.to_string()).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            set_key(&mut cfg, &key, value)?;
            let path = config::save_config(&cfg)?;
            output::success(
                &format!("Set {key} in {}", path.display()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config()?;
    eprintln!("Catalog CLI configuration");
    eprintln!("   Config path: {}\n", config::config_path().display());

    let env_index = Select::new()
        .with_prompt("Backend environment")
        .items(Environment::VARIANTS)
        .default(usize::from(cfg.environment == Environment::Production))
        .interact()
        .map_err(prompt_err)?;
    set_key(&mut cfg, "environment", Environment::VARIANTS[env_index].to_owned())?;

    let api_url: String = Input::new()
        .with_prompt("API URL override (empty to use the environment default)")
        .default(cfg.api_url.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    set_key(&mut cfg, "api_url", api_url)?;

    let store_index = Select::new()
        .with_prompt("Where to keep the session token?")
        .items(TokenStore::VARIANTS)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    set_key(&mut cfg, "token_store", TokenStore::VARIANTS[store_index].to_owned())?;

    let timeout: String = Input::new()
        .with_prompt("Request timeout in seconds (empty for none)")
        .default(cfg.timeout_secs.map(|s| s.to_string()).unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    set_key(&mut cfg, "timeout_secs", timeout)?;

    let path = config::save_config(&cfg)?;
    output::success(
        &format!("Configuration written to {}", path.display()),
        &global.color,
        global.quiet,
    );
    output::note("Sign in with: catalog auth login", &global.color, global.quiet);
    Ok(())
}
