//! Command dispatch: bridges CLI args -> catalog operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod pages;
pub mod payload;
pub mod resources;
pub mod users;
pub mod util;

use catalog_core::Catalog;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, catalog: &Catalog, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(catalog, args, global).await,
        Command::Users(args) => users::handle(catalog, args, global).await,
        Command::List(args) => resources::list(catalog, args, global).await,
        Command::Get { kind, id } => resources::get(catalog, kind, id, global).await,
        Command::Create(args) => resources::create(catalog, args, global).await,
        Command::Update(args) => resources::update(catalog, args, global).await,
        Command::Delete { kind, id } => resources::delete(catalog, kind, id, global).await,
        Command::Pages { kind } => pages::handle(kind, global),
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(_) => Err(CliError::Internal {
            message: "completions are generated before connecting".into(),
        }),
    }
}
