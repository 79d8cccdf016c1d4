//! Page catalog listing. Works offline.

use tabled::Tabled;

use catalog_core::{CatalogPage, ResourceKind, pages};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Slug")]
    slug: &'static str,
    #[tabled(rename = "English")]
    name_en: &'static str,
    #[tabled(rename = "Arabic")]
    name_ar: &'static str,
}

impl From<&CatalogPage> for PageRow {
    fn from(p: &CatalogPage) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            name_en: p.name_en,
            name_ar: p.name_ar,
        }
    }
}

pub fn handle(kind: ResourceKind, global: &GlobalOpts) -> Result<(), CliError> {
    let catalog = pages::pages_for(kind);
    if catalog.is_empty() {
        output::note(
            &format!("{} have no fixed page list", kind.label()),
            &global.color,
            global.quiet,
        );
        return Ok(());
    }

    let out = output::render_list(&global.output, catalog, |p| PageRow::from(p), |p| p.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
