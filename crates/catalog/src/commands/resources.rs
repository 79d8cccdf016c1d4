//! Resource command handlers: list, get, create, update, delete.
//!
//! Every handler is generic over a `Resource` marker; `by_kind!` picks the
//! marker for the kind named on the command line.

use serde::Serialize;
use tabled::Tabled;

use catalog_core::{
    AppVersionPricing, Brand, Catalog, CatalogEntity, EntityId, ListQuery, ManagementView, Pricing,
    Resource, ResourceKind, Searchable, Service, Validate, kinds, pages,
};

use crate::cli::{CreateArgs, GlobalOpts, ListArgs, OutputFormat, UpdateArgs};
use crate::error::CliError;
use crate::output::{self, detail_lines, or_dash, yes_no};

use super::payload::{CreatePayload, UpdatePayload};
use super::util;

macro_rules! by_kind {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            ResourceKind::Services => {
                type $r = kinds::Services;
                $body
            }
            ResourceKind::DesignServices => {
                type $r = kinds::DesignServices;
                $body
            }
            ResourceKind::DevelopmentServices => {
                type $r = kinds::DevelopmentServices;
                $body
            }
            ResourceKind::SupportServices => {
                type $r = kinds::SupportServices;
                $body
            }
            ResourceKind::AppVersionServices => {
                type $r = kinds::AppVersionServices;
                $body
            }
            ResourceKind::Pricings => {
                type $r = kinds::Pricings;
                $body
            }
            ResourceKind::DesignPricings => {
                type $r = kinds::DesignPricings;
                $body
            }
            ResourceKind::DevelopmentPricings => {
                type $r = kinds::DevelopmentPricings;
                $body
            }
            ResourceKind::SupportPricings => {
                type $r = kinds::SupportPricings;
                $body
            }
            ResourceKind::AppVersionPricings => {
                type $r = kinds::AppVersionPricings;
                $body
            }
            ResourceKind::Brands => {
                type $r = kinds::Brands;
                $body
            }
        }
    };
}

// ── Rendering ───────────────────────────────────────────────────────

/// Table row and detail block for an entity.
pub trait Render: CatalogEntity + Searchable + Serialize {
    type Row: Tabled;

    fn row(&self) -> Self::Row;
    fn detail(&self) -> String;
}

#[derive(Tabled)]
pub struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Page")]
    page: u32,
    #[tabled(rename = "Title (EN)")]
    title_en: String,
    #[tabled(rename = "Title (AR)")]
    title_ar: String,
    #[tabled(rename = "Order")]
    order: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl Render for Service {
    type Row = ServiceRow;

    fn row(&self) -> ServiceRow {
        ServiceRow {
            id: self.id.to_string(),
            page: self.page_number,
            title_en: self.title_en.clone(),
            title_ar: self.title_ar.clone(),
            order: or_dash(self.display_order),
            active: yes_no(self.is_active),
        }
    }

    fn detail(&self) -> String {
        detail_lines(&[
            ("ID", self.id.to_string()),
            ("Page", self.page_number.to_string()),
            ("Title (EN)", self.title_en.clone()),
            ("Title (AR)", self.title_ar.clone()),
            ("Description (EN)", or_dash(self.description_en.as_deref())),
            ("Description (AR)", or_dash(self.description_ar.as_deref())),
            ("Image", or_dash(self.img.as_deref())),
            ("Order", or_dash(self.display_order)),
            ("Active", yes_no(self.is_active)),
            ("Created", or_dash(self.created_at)),
            ("Updated", or_dash(self.updated_at)),
        ])
    }
}

#[derive(Tabled)]
pub struct PricingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Page")]
    page: u32,
    #[tabled(rename = "Title (EN)")]
    title_en: String,
    #[tabled(rename = "Title (AR)")]
    title_ar: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Active")]
    active: String,
}

fn item_lines(items: &[catalog_core::PriceItem]) -> String {
    if items.is_empty() {
        return "-".into();
    }
    items
        .iter()
        .map(|i| format!("• {} / {}", i.text_en, i.text_ar))
        .collect::<Vec<_>>()
        .join("\n  ")
}

impl Render for Pricing {
    type Row = PricingRow;

    fn row(&self) -> PricingRow {
        PricingRow {
            id: self.id.to_string(),
            page: self.page_number,
            title_en: self.title_en.clone(),
            title_ar: self.title_ar.clone(),
            price: format!("{:.2}", self.price),
            items: self.items.len(),
            active: yes_no(self.is_active),
        }
    }

    fn detail(&self) -> String {
        let mut out = detail_lines(&[
            ("ID", self.id.to_string()),
            ("Page", self.page_number.to_string()),
            ("Title (EN)", self.title_en.clone()),
            ("Title (AR)", self.title_ar.clone()),
            ("Price", format!("{:.2}", self.price)),
            ("Active", yes_no(self.is_active)),
            ("Created", or_dash(self.created_at)),
            ("Updated", or_dash(self.updated_at)),
        ]);
        out.push_str("\nItems:\n  ");
        out.push_str(&item_lines(&self.items));
        out
    }
}

#[derive(Tabled)]
pub struct AppVersionPricingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Page")]
    page: u32,
    #[tabled(rename = "Title (EN)")]
    title_en: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Featured")]
    featured: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl Render for AppVersionPricing {
    type Row = AppVersionPricingRow;

    fn row(&self) -> AppVersionPricingRow {
        let currency = self.currency.as_deref().unwrap_or("");
        AppVersionPricingRow {
            id: self.id.to_string(),
            page: self.page_number,
            title_en: self.title_en.clone(),
            price: format!("{:.2} {currency}", self.price).trim_end().to_owned(),
            period: or_dash(self.period_en.as_deref()),
            featured: yes_no(self.is_featured),
            active: yes_no(self.is_active),
        }
    }

    fn detail(&self) -> String {
        let mut out = detail_lines(&[
            ("ID", self.id.to_string()),
            ("Page", self.page_number.to_string()),
            ("Title (EN)", self.title_en.clone()),
            ("Title (AR)", self.title_ar.clone()),
            ("Subtitle (EN)", or_dash(self.subtitle_en.as_deref())),
            ("Subtitle (AR)", or_dash(self.subtitle_ar.as_deref())),
            ("Price", format!("{:.2}", self.price)),
            ("Currency", or_dash(self.currency.as_deref())),
            ("Period (EN)", or_dash(self.period_en.as_deref())),
            ("Period (AR)", or_dash(self.period_ar.as_deref())),
            ("Features (EN)", or_dash(self.features_en.as_deref())),
            ("Features (AR)", or_dash(self.features_ar.as_deref())),
            ("Featured", yes_no(self.is_featured)),
            ("Order", or_dash(self.display_order)),
            ("Active", yes_no(self.is_active)),
        ]);
        out.push_str("\nItems:\n  ");
        out.push_str(&item_lines(&self.items));
        out
    }
}

#[derive(Tabled)]
pub struct BrandRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Image")]
    img: String,
    #[tabled(rename = "Order")]
    order: String,
}

impl Render for Brand {
    type Row = BrandRow;

    fn row(&self) -> BrandRow {
        BrandRow {
            id: self.id.to_string(),
            img: self.img.clone(),
            order: or_dash(self.order),
        }
    }

    fn detail(&self) -> String {
        detail_lines(&[
            ("ID", self.id.to_string()),
            ("Image", self.img.clone()),
            ("Order", or_dash(self.order)),
        ])
    }
}

fn print_entity<E: Render>(entity: &E, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, entity, E::detail, |e| e.id().to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── List ────────────────────────────────────────────────────────────

pub async fn list(catalog: &Catalog, args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    by_kind!(args.kind, R => list_kind::<R>(catalog, &args, global).await)
}

async fn list_kind<R>(catalog: &Catalog, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError>
where
    R: Resource,
    R::Entity: Render,
{
    let view = ManagementView::<R>::new(catalog.clone());
    match args.page {
        _ if args.all => view.load(None).await?,
        Some(n) => view.select_page(n).await?,
        None => view.refresh().await?,
    }
    let snap = view.snapshot();

    let mut query = ListQuery::default().with_per_page(args.per_page);
    if let Some(term) = &args.search {
        query = query.with_search(term.as_str());
    }
    let slice = snap.visible(&query.with_page(args.view_page));

    let out = output::render_list(&global.output, &slice.items, Render::row, |e| e.id().to_string())?;
    output::print_output(&out, global.quiet);

    if matches!(global.output, OutputFormat::Table) {
        let scope = snap.page.map_or_else(
            || "all pages".to_owned(),
            |n| {
                pages::page_by_id(R::KIND, n)
                    .map_or_else(|| format!("page {n}"), |p| p.name_en.to_owned())
            },
        );
        output::note(
            &format!(
                "{} {} on {scope}, page {}/{}",
                slice.total_items,
                R::KIND.label(),
                slice.page,
                slice.total_pages
            ),
            &global.color,
            global.quiet,
        );
    }
    Ok(())
}

// ── Get ─────────────────────────────────────────────────────────────

pub async fn get(
    catalog: &Catalog,
    kind: ResourceKind,
    id: EntityId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    by_kind!(kind, R => {
        let entity = catalog.get::<R>(id).await?;
        print_entity(entity.as_ref(), global)
    })
}

// ── Create / Update ─────────────────────────────────────────────────

pub async fn create(catalog: &Catalog, args: CreateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    by_kind!(args.kind, R => create_kind::<R>(catalog, &args, global).await)
}

async fn create_kind<R>(catalog: &Catalog, args: &CreateArgs, global: &GlobalOpts) -> Result<(), CliError>
where
    R: Resource,
    R::Entity: Render,
    R::Create: CreatePayload + Validate,
{
    let payload = <R::Create as CreatePayload>::from_args(R::KIND, args)?;
    let created = catalog.create::<R>(&payload).await?;
    output::success(
        &format!("Created {} {}", R::KIND.singular(), created.id()),
        &global.color,
        global.quiet,
    );
    print_entity(&created, global)
}

pub async fn update(catalog: &Catalog, args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    by_kind!(args.kind, R => update_kind::<R>(catalog, &args, global).await)
}

async fn update_kind<R>(catalog: &Catalog, args: &UpdateArgs, global: &GlobalOpts) -> Result<(), CliError>
where
    R: Resource,
    R::Entity: Render,
    R::Update: UpdatePayload + Validate,
{
    let payload = <R::Update as UpdatePayload>::from_args(R::KIND, args)?;
    let updated = catalog.update::<R>(args.id, &payload).await?;
    output::success(
        &format!("Updated {} {}", R::KIND.singular(), args.id),
        &global.color,
        global.quiet,
    );
    print_entity(&updated, global)
}

// ── Delete ──────────────────────────────────────────────────────────

pub async fn delete(
    catalog: &Catalog,
    kind: ResourceKind,
    id: EntityId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let prompt = format!("Delete {} {id}? This cannot be undone.", kind.singular());
    if !util::confirm(&prompt, &format!("delete {kind}"), global.yes)? {
        return Ok(());
    }

    by_kind!(kind, R => catalog.delete::<R>(id).await?);
    output::success(
        &format!("Deleted {} {id}", kind.singular()),
        &global.color,
        global.quiet,
    );
    Ok(())
}
