//! Request payloads built from command-line flags.
//!
//! Each resource family reads the flags that apply to it and rejects the
//! rest, so `--price` on a brand is an error rather than silently ignored.
//! Field rules (titles, prices) are left to the core validators.

use std::path::Path;

use catalog_core::pages;
use catalog_core::{
    CreateBrandRequest, CreatePricingRequest, CreateServiceRequest, ImageUpload, NewPriceItem,
    ResourceKind, UpdateBrandRequest, UpdatePricingRequest, UpdateServiceRequest,
};

use crate::cli::{CreateArgs, UpdateArgs};
use crate::error::CliError;

pub trait CreatePayload: Sized {
    fn from_args(kind: ResourceKind, args: &CreateArgs) -> Result<Self, CliError>;
}

pub trait UpdatePayload: Sized {
    fn from_args(kind: ResourceKind, args: &UpdateArgs) -> Result<Self, CliError>;
}

// ── Shared helpers ───────────────────────────────────────────────────

fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    ImageUpload::from_path(path)
        .map_err(|e| CliError::validation("image", format!("{}: {e}", path.display())))
}

fn reject(kind: ResourceKind, flags: &[(&str, bool)]) -> Result<(), CliError> {
    match flags.iter().find(|(_, given)| *given) {
        Some((flag, _)) => Err(CliError::validation(
            flag,
            format!("does not apply to {}", kind.label()),
        )),
        None => Ok(()),
    }
}

/// Explicit `--page`, else the family's first page.
fn page_or_default(kind: ResourceKind, page: Option<u32>) -> Result<u32, CliError> {
    page.or_else(|| pages::default_page(kind))
        .ok_or_else(|| CliError::validation("page", format!("is required for {}", kind.label())))
}

/// Items keep the order they were given on the command line.
fn ordered(items: &[NewPriceItem]) -> Option<Vec<NewPriceItem>> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .zip(0..)
            .map(|(item, order)| NewPriceItem {
                display_order: Some(order),
                ..item.clone()
            })
            .collect(),
    )
}

fn nothing_to_update(empty: bool) -> Result<(), CliError> {
    if empty {
        Err(CliError::validation("update", "no fields given"))
    } else {
        Ok(())
    }
}

// ── Services ─────────────────────────────────────────────────────────

impl CreatePayload for CreateServiceRequest {
    fn from_args(kind: ResourceKind, args: &CreateArgs) -> Result<Self, CliError> {
        reject(
            kind,
            &[
                ("price", args.price.is_some()),
                ("item", !args.items.is_empty()),
                ("order", args.order.is_some()),
            ],
        )?;
        let image = args
            .image
            .as_deref()
            .ok_or_else(|| CliError::validation("image", "is required"))?;

        Ok(Self {
            page_number: page_or_default(kind, args.page)?,
            title_ar: args.title_ar.clone().unwrap_or_default(),
            title_en: args.title_en.clone().unwrap_or_default(),
            description_ar: args.description_ar.clone(),
            description_en: args.description_en.clone(),
            display_order: args.display_order,
            image: read_image(image)?,
        })
    }
}

impl UpdatePayload for UpdateServiceRequest {
    fn from_args(kind: ResourceKind, args: &UpdateArgs) -> Result<Self, CliError> {
        reject(
            kind,
            &[
                ("price", args.price.is_some()),
                ("item", !args.items.is_empty()),
                ("order", args.order.is_some()),
            ],
        )?;
        let request = Self {
            page_number: args.page,
            title_ar: args.title_ar.clone(),
            title_en: args.title_en.clone(),
            description_ar: args.description_ar.clone(),
            description_en: args.description_en.clone(),
            is_active: args.active,
            display_order: args.display_order,
            image: args.image.as_deref().map(read_image).transpose()?,
        };
        nothing_to_update(
            request.page_number.is_none()
                && request.title_ar.is_none()
                && request.title_en.is_none()
                && request.description_ar.is_none()
                && request.description_en.is_none()
                && request.is_active.is_none()
                && request.display_order.is_none()
                && request.image.is_none(),
        )?;
        Ok(request)
    }
}

// ── Pricings ─────────────────────────────────────────────────────────

impl CreatePayload for CreatePricingRequest {
    fn from_args(kind: ResourceKind, args: &CreateArgs) -> Result<Self, CliError> {
        reject(
            kind,
            &[
                ("image", args.image.is_some()),
                ("order", args.order.is_some()),
                ("description-ar", args.description_ar.is_some()),
                ("description-en", args.description_en.is_some()),
                ("display-order", args.display_order.is_some()),
            ],
        )?;

        Ok(Self {
            page_number: page_or_default(kind, args.page)?,
            title_ar: args.title_ar.clone().unwrap_or_default(),
            title_en: args.title_en.clone().unwrap_or_default(),
            price: args
                .price
                .ok_or_else(|| CliError::validation("price", "is required"))?,
            items: ordered(&args.items),
        })
    }
}

impl UpdatePayload for UpdatePricingRequest {
    fn from_args(kind: ResourceKind, args: &UpdateArgs) -> Result<Self, CliError> {
        reject(
            kind,
            &[
                ("image", args.image.is_some()),
                ("order", args.order.is_some()),
                ("description-ar", args.description_ar.is_some()),
                ("description-en", args.description_en.is_some()),
                ("display-order", args.display_order.is_some()),
            ],
        )?;
        let request = Self {
            page_number: args.page,
            title_ar: args.title_ar.clone(),
            title_en: args.title_en.clone(),
            price: args.price,
            is_active: args.active,
            items: ordered(&args.items),
        };
        nothing_to_update(request == Self::default())?;
        Ok(request)
    }
}

// ── Brands ───────────────────────────────────────────────────────────

impl CreatePayload for CreateBrandRequest {
    fn from_args(kind: ResourceKind, args: &CreateArgs) -> Result<Self, CliError> {
        reject(
            kind,
            &[
                ("page", args.page.is_some()),
                ("title-ar", args.title_ar.is_some()),
                ("title-en", args.title_en.is_some()),
                ("description-ar", args.description_ar.is_some()),
                ("description-en", args.description_en.is_some()),
                ("price", args.price.is_some()),
                ("item", !args.items.is_empty()),
            ],
        )?;
        let image = args
            .image
            .as_deref()
            .ok_or_else(|| CliError::validation("image", "is required"))?;

        Ok(Self {
            order: args.order.or(args.display_order),
            image: read_image(image)?,
        })
    }
}

impl UpdatePayload for UpdateBrandRequest {
    fn from_args(kind: ResourceKind, args: &UpdateArgs) -> Result<Self, CliError> {
        reject(
            kind,
            &[
                ("page", args.page.is_some()),
                ("title-ar", args.title_ar.is_some()),
                ("title-en", args.title_en.is_some()),
                ("description-ar", args.description_ar.is_some()),
                ("description-en", args.description_en.is_some()),
                ("active", args.active.is_some()),
                ("price", args.price.is_some()),
                ("item", !args.items.is_empty()),
            ],
        )?;

        let request = Self {
            order: args.order.or(args.display_order),
            image: args.image.as_deref().map(read_image).transpose()?,
        };
        nothing_to_update(request.order.is_none() && request.image.is_none())?;
        Ok(request)
    }
}
