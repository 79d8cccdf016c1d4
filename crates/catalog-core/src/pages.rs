// ── Page catalogs ──
//
// Each service family renders its entities on a fixed set of public
// pages; `page_number` on an entity is an index into one of these lists.
// Pricing families share their service family's pages.

use catalog_api::ResourceKind;
use serde::Serialize;

/// One public page an entity can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub id: u32,
    pub slug: &'static str,
    pub name_ar: &'static str,
    pub name_en: &'static str,
}

const fn page(
    id: u32,
    slug: &'static str,
    name_ar: &'static str,
    name_en: &'static str,
) -> CatalogPage {
    CatalogPage {
        id,
        slug,
        name_ar,
        name_en,
    }
}

pub const SERVICE_PAGES: &[CatalogPage] = &[
    page(1, "web-hosting", "استضافة المواقع", "Web Hosting"),
    page(2, "reseller-hosting", "استضافة الموزعين", "Reseller Hosting"),
    page(3, "private-servers", "السيرفرات الخاصة", "Private Servers"),
    page(4, "email-services", "البريد الإلكتروني", "Email Services"),
];

// "wep-design" is the slug the public site routes on.
pub const DESIGN_PAGES: &[CatalogPage] = &[
    page(1, "wep-design", "تصميم الويب", "Web Design"),
    page(2, "game-design", "تصميم الالعاب", "Game Design"),
    page(3, "app-design", "تصميم التطبيقات", "App Design"),
    page(4, "video-design", "تصميم الفيديو", "Video Design"),
];

pub const DEVELOPMENT_PAGES: &[CatalogPage] = &[
    page(1, "game-development", "برمجة الألعاب", "Game Development"),
    page(2, "web-applications", "تطبيقات الويب", "Web Applications"),
    page(3, "mobile-applications", "تطبيقات الموبايل", "Mobile Applications"),
];

pub const SUPPORT_PAGES: &[CatalogPage] = &[
    page(1, "technical-support", "الدعم الفني", "Technical Support"),
    page(2, "secure-vpn", "شبكات VPN الآمنة", "Secure VPN Networks"),
    page(3, "call-centers", "مراكز الاتصال", "Call Centers"),
    page(4, "cybersecurity", "الأمن السيبراني", "Cybersecurity"),
];

/// The page list for `kind`. Empty for app-version resources and brands.
pub fn pages_for(kind: ResourceKind) -> &'static [CatalogPage] {
    match kind {
        ResourceKind::Services | ResourceKind::Pricings => SERVICE_PAGES,
        ResourceKind::DesignServices | ResourceKind::DesignPricings => DESIGN_PAGES,
        ResourceKind::DevelopmentServices | ResourceKind::DevelopmentPricings => DEVELOPMENT_PAGES,
        ResourceKind::SupportServices | ResourceKind::SupportPricings => SUPPORT_PAGES,
        ResourceKind::AppVersionServices
        | ResourceKind::AppVersionPricings
        | ResourceKind::Brands => &[],
    }
}

pub fn page_by_id(kind: ResourceKind, id: u32) -> Option<&'static CatalogPage> {
    pages_for(kind).iter().find(|p| p.id == id)
}

pub fn page_by_slug(kind: ResourceKind, slug: &str) -> Option<&'static CatalogPage> {
    pages_for(kind).iter().find(|p| p.slug == slug)
}

/// The page a management view opens on: the first page of the kind's
/// catalog, or no filter when the kind has none.
pub fn default_page(kind: ResourceKind) -> Option<u32> {
    pages_for(kind).first().map(|p| p.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn pricings_share_service_family_pages() {
        assert_eq!(
            pages_for(ResourceKind::SupportPricings),
            pages_for(ResourceKind::SupportServices)
        );
        assert_eq!(pages_for(ResourceKind::Pricings).len(), 4);
        assert_eq!(pages_for(ResourceKind::DevelopmentServices).len(), 3);
    }

    #[test]
    fn lookup_by_id_and_slug() {
        let vpn = page_by_slug(ResourceKind::SupportServices, "secure-vpn");
        assert_eq!(vpn.map(|p| p.id), Some(2));
        assert_eq!(
            page_by_id(ResourceKind::DesignServices, 4).map(|p| p.name_en),
            Some("Video Design")
        );
        assert!(page_by_id(ResourceKind::Services, 9).is_none());
    }

    #[test]
    fn default_page_is_first_or_none() {
        for kind in ResourceKind::iter() {
            let expected = if pages_for(kind).is_empty() { None } else { Some(1) };
            assert_eq!(default_page(kind), expected, "{kind}");
        }
        assert_eq!(default_page(ResourceKind::Brands), None);
    }
}
