//! Auth command handlers.

use catalog_core::{Catalog, SignUpRequest, User};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts, SignUpArgs};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash};

use super::util;

fn user_detail(u: &User) -> String {
    detail_lines(&[
        ("ID", u.id.clone()),
        ("Email", u.email.clone()),
        ("Name", u.full_name.clone()),
        ("Role", or_dash(u.role.as_deref())),
    ])
}

pub async fn handle(catalog: &Catalog, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Login {
            email,
            password_stdin,
        } => {
            let email = match email {
                Some(email) => email,
                None => util::prompt_text("Email")?,
            };
            let password = if password_stdin {
                util::read_secret_line()?
            } else {
                util::prompt_secret("Password")?
            };

            let session = catalog.login(&email, &password).await?;
            let who = session.user.map_or(email, |u| {
                if u.full_name.is_empty() {
                    u.email
                } else {
                    format!("{} <{}>", u.full_name, u.email)
                }
            });
            output::success(&format!("Signed in as {who}"), &global.color, global.quiet);
            Ok(())
        }

        AuthCommand::Logout => {
            catalog.logout()?;
            output::success("Signed out", &global.color, global.quiet);
            Ok(())
        }

        AuthCommand::Whoami => {
            let user = catalog.require_user().await?;
            let out = output::render_single(&global.output, &user, user_detail, |u| u.email.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::ChangePassword => {
            let current = util::prompt_secret("Current password")?;
            let new = util::prompt_secret("New password")?;
            let confirm = util::prompt_secret("Confirm new password")?;

            catalog.change_password(&current, &new, &confirm).await?;
            output::success("Password changed", &global.color, global.quiet);
            Ok(())
        }

        AuthCommand::SignUp(args) => sign_up(catalog, args, global).await,
    }
}

async fn sign_up(catalog: &Catalog, args: SignUpArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let password = util::prompt_secret("Password")?;
    let confirm = util::prompt_secret("Confirm password")?;

    let request = SignUpRequest {
        email: args.email,
        password,
        phone: args.phone,
        full_name: args.full_name,
        job_title: args.job_title,
        address: args.address,
        about: args.about,
    };
    catalog.sign_up(&request, &confirm).await?;

    output::success(
        &format!("Account created for {}", request.email),
        &global.color,
        global.quiet,
    );
    Ok(())
}
