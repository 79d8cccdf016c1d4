//! Staff account handlers.

use secrecy::ExposeSecret;
use tabled::Tabled;

use catalog_core::{Catalog, ImageUpload, UpdateUserRequest, UserProfile};

use crate::cli::{GlobalOpts, OutputFormat, UserUpdateArgs, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash};

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Job title")]
    job_title: String,
}

impl From<&UserProfile> for UserRow {
    fn from(u: &UserProfile) -> Self {
        Self {
            id: u.id.clone(),
            name: or_dash(u.full_name.as_deref()),
            email: u.email.clone(),
            phone: or_dash(u.phone.as_deref()),
            job_title: or_dash(u.job_title.as_deref()),
        }
    }
}

fn profile_detail(p: &UserProfile) -> String {
    detail_lines(&[
        ("ID", p.id.clone()),
        ("Name", or_dash(p.full_name.as_deref())),
        ("Email", p.email.clone()),
        ("Job title", or_dash(p.job_title.as_deref())),
        ("Phone", or_dash(p.phone.as_deref())),
        ("Address", or_dash(p.address.as_deref())),
        ("About", or_dash(p.about.as_deref())),
        ("Picture", or_dash(p.image_url.as_deref())),
        ("Joined", or_dash(p.created_at)),
    ])
}

fn render_profile(profile: &UserProfile, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, profile, profile_detail, |p| p.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Build a sparse update from the flags. `--password` prompts twice.
fn update_request(args: UserUpdateArgs) -> Result<UpdateUserRequest, CliError> {
    let password = if args.password {
        let new = util::prompt_secret("New password")?;
        let confirm = util::prompt_secret("Confirm new password")?;
        if new.expose_secret() != confirm.expose_secret() {
            return Err(CliError::validation("confirm_password", "does not match"));
        }
        Some(new)
    } else {
        None
    };

    let request = UpdateUserRequest {
        full_name: args.full_name,
        email: args.email,
        password,
        phone: args.phone,
        job_title: args.job_title,
        address: args.address,
        about: args.about,
    };
    if request.is_empty() {
        return Err(CliError::validation(
            "user",
            "nothing to update; pass at least one field flag",
        ));
    }
    Ok(request)
}

pub async fn handle(catalog: &Catalog, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = catalog.users().await?;
            let out = output::render_list(&global.output, users.as_slice(), |u| UserRow::from(u), |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::note(&format!("{} users", users.len()), &global.color, global.quiet);
            }
            Ok(())
        }

        UsersCommand::Get { id } => {
            let profile = catalog.profile(&id).await?;
            render_profile(&profile, global)
        }

        UsersCommand::Update(args) => {
            let id = args.id.clone();
            let request = update_request(args)?;
            let updated = catalog.update_user(&id, &request).await?;
            output::success(&format!("Updated user {id}"), &global.color, global.quiet);
            render_profile(&updated, global)
        }

        UsersCommand::Delete { id } => {
            let prompt = format!("Delete user {id}? This cannot be undone.");
            if !util::confirm(&prompt, "delete user", global.yes)? {
                return Ok(());
            }
            catalog.delete_user(&id).await?;
            output::success(&format!("Deleted user {id}"), &global.color, global.quiet);
            Ok(())
        }

        UsersCommand::UploadPicture { id, file } => {
            let picture = ImageUpload::from_path(&file)
                .map_err(|e| CliError::validation("file", format!("{}: {e}", file.display())))?;
            let url = catalog.upload_user_picture(&id, &picture).await?;
            let message = url.map_or_else(
                || format!("Uploaded picture for user {id}"),
                |url| format!("Uploaded picture for user {id}: {url}"),
            );
            output::success(&message, &global.color, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(id: &str) -> UserUpdateArgs {
        UserUpdateArgs {
            id: id.into(),
            full_name: None,
            email: None,
            phone: None,
            job_title: None,
            address: None,
            about: None,
            password: false,
        }
    }

    #[test]
    fn update_without_flags_is_rejected() {
        let err = update_request(args("7")).unwrap_err();
        assert!(err.to_string().contains("nothing to update"));
    }

    #[test]
    fn update_keeps_only_given_fields() {
        let mut a = args("7");
        a.job_title = Some("Lead".into());
        let req = update_request(a).unwrap();
        assert_eq!(req.job_title.as_deref(), Some("Lead"));
        assert!(req.full_name.is_none() && req.password.is_none());
    }

    #[test]
    fn row_fills_missing_fields_with_dash() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 3, "email": "a@b.c"
        }))
        .unwrap();
        let row = UserRow::from(&profile);
        assert_eq!(row.name, "-");
        assert_eq!(row.email, "a@b.c");
    }
}
