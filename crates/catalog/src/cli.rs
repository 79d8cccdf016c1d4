//! Clap derive structures for the `catalog` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser, Subcommand, ValueEnum};
use strum::IntoEnumIterator;

use catalog_core::{EntityId, NewPriceItem, ResourceKind};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// catalog -- admin client for the bilingual service catalog
#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    version,
    about = "Manage the bilingual service catalog from the command line",
    long_about = "Admin client for the catalog API: services, pricings and brands\n\
        with Arabic and English content, grouped into fixed public pages.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Catalog API root (overrides the config file)
    #[arg(long, short = 'u', env = "CATALOG_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CATALOG_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in, sign out and manage accounts
    Auth(AuthArgs),

    /// Manage staff accounts
    Users(UsersArgs),

    /// List entities of a resource
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one entity
    Get {
        #[arg(value_parser = kind_parser())]
        kind: ResourceKind,
        id: EntityId,
    },

    /// Create an entity
    Create(CreateArgs),

    /// Change selected fields of an entity
    Update(UpdateArgs),

    /// Delete an entity
    #[command(alias = "rm")]
    Delete {
        #[arg(value_parser = kind_parser())]
        kind: ResourceKind,
        id: EntityId,
    },

    /// Show the fixed public pages of a resource family
    Pages {
        #[arg(value_parser = kind_parser())]
        kind: ResourceKind,
    },

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Resource kinds by their API path (`design-pricings`, `brands`, ...).
pub fn kind_parser() -> impl TypedValueParser<Value = ResourceKind> {
    PossibleValuesParser::new(ResourceKind::iter().map(<&'static str>::from))
        .try_map(|raw: String| raw.parse::<ResourceKind>())
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Read the password from the first line of stdin
        #[arg(long)]
        password_stdin: bool,
    },

    /// Forget the stored session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Change the signed-in user's password
    ChangePassword,

    /// Register a new staff account
    SignUp(SignUpArgs),
}

#[derive(Debug, Args)]
pub struct SignUpArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub job_title: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub about: Option<String>,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List staff accounts
    #[command(alias = "ls")]
    List,

    /// Show one account's profile
    #[command(visible_alias = "profile")]
    Get { id: String },

    /// Change selected fields of an account
    Update(UserUpdateArgs),

    /// Delete an account
    #[command(alias = "rm")]
    Delete { id: String },

    /// Replace an account's profile picture
    UploadPicture {
        id: String,

        /// Image file to upload
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct UserUpdateArgs {
    pub id: String,

    #[arg(long)]
    pub full_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub job_title: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub about: Option<String>,

    /// Prompt for a new password
    #[arg(long)]
    pub password: bool,
}

// ── Listing ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(value_parser = kind_parser())]
    pub kind: ResourceKind,

    /// Public page to filter on (defaults to the family's first page)
    #[arg(long, short = 'p', conflicts_with = "all")]
    pub page: Option<u32>,

    /// List every page
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Case-insensitive search over titles
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Which slice of the filtered list to show
    #[arg(long, default_value = "1")]
    pub view_page: usize,

    /// Rows per slice
    #[arg(long, default_value = "10")]
    pub per_page: usize,
}

// ── Create / Update ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(value_parser = kind_parser())]
    pub kind: ResourceKind,

    /// Public page (defaults to the family's first page)
    #[arg(long, short = 'p')]
    pub page: Option<u32>,

    #[arg(long)]
    pub title_ar: Option<String>,

    #[arg(long)]
    pub title_en: Option<String>,

    #[arg(long)]
    pub description_ar: Option<String>,

    #[arg(long)]
    pub description_en: Option<String>,

    #[arg(long)]
    pub display_order: Option<i32>,

    /// Price (pricing resources)
    #[arg(long)]
    pub price: Option<f64>,

    /// Price item as `ARABIC|ENGLISH`, repeatable (pricing resources)
    #[arg(long = "item", value_parser = parse_item)]
    pub items: Vec<NewPriceItem>,

    /// Image file (services and brands)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Sort position (brands)
    #[arg(long)]
    pub order: Option<i32>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(value_parser = kind_parser())]
    pub kind: ResourceKind,

    pub id: EntityId,

    /// Move to another public page
    #[arg(long, short = 'p')]
    pub page: Option<u32>,

    #[arg(long)]
    pub title_ar: Option<String>,

    #[arg(long)]
    pub title_en: Option<String>,

    #[arg(long)]
    pub description_ar: Option<String>,

    #[arg(long)]
    pub description_en: Option<String>,

    #[arg(long)]
    pub display_order: Option<i32>,

    /// Show or hide on the public site
    #[arg(long)]
    pub active: Option<bool>,

    #[arg(long)]
    pub price: Option<f64>,

    /// Replace all price items, `ARABIC|ENGLISH`, repeatable
    #[arg(long = "item", value_parser = parse_item)]
    pub items: Vec<NewPriceItem>,

    /// Replace the image
    #[arg(long)]
    pub image: Option<PathBuf>,

    #[arg(long)]
    pub order: Option<i32>,
}

fn parse_item(raw: &str) -> Result<NewPriceItem, String> {
    let (text_ar, text_en) = raw
        .split_once('|')
        .ok_or_else(|| format!("expected ARABIC|ENGLISH, got {raw:?}"))?;
    Ok(NewPriceItem {
        text_ar: text_ar.trim().to_owned(),
        text_en: text_en.trim().to_owned(),
        display_order: None,
    })
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a single key (api_url, environment, timeout_secs, stale_after,
    /// token_store, insecure, ca_cert)
    Set { key: String, value: String },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn kind_arguments_use_api_paths() {
        let cli = Cli::try_parse_from(["catalog", "get", "design-pricings", "7"]).unwrap();
        match cli.command {
            Command::Get { kind, id } => {
                assert_eq!(kind, ResourceKind::DesignPricings);
                assert_eq!(id, EntityId(7));
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["catalog", "get", "widgets", "7"]).is_err());
    }

    #[test]
    fn items_split_on_pipe() {
        let item = parse_item(" نطاق مجاني | Free domain ").unwrap();
        assert_eq!(item.text_ar, "نطاق مجاني");
        assert_eq!(item.text_en, "Free domain");
        assert!(parse_item("no separator").is_err());
    }

    #[test]
    fn page_conflicts_with_all() {
        assert!(Cli::try_parse_from(["catalog", "list", "pricings", "--all", "--page", "2"]).is_err());
    }
}
