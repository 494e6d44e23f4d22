use crate::filters::Breadcrumb;
use crate::types::CatalogEntity;

pub const DEFAULT_PAGE_TITLE: &str = "All Products";

/// Derive the breadcrumb trail and page title from resolved display names.
///
/// Breadcrumbs start from the fixed base (`Home`, `Shop`) and append one
/// entry per resolved level; each entry's path is the accumulated canonical
/// prefix through that level.
pub fn derive(
    category: Option<&CatalogEntity>,
    sub_category: Option<&CatalogEntity>,
    brand: Option<&CatalogEntity>,
) -> (Vec<Breadcrumb>, String) {
    let mut breadcrumbs = vec![
        Breadcrumb::new("Home", "/"),
        Breadcrumb::new("Shop", "/shop"),
    ];
    let mut prefix = String::new();

    if let Some(category) = category {
        prefix = format!("/category/{}", category.slug);
        breadcrumbs.push(Breadcrumb::new(&category.name, &prefix));
    }
    if let Some(sub_category) = sub_category {
        prefix = format!("{prefix}/subcategory/{}", sub_category.slug);
        breadcrumbs.push(Breadcrumb::new(&sub_category.name, &prefix));
    }
    if let Some(brand) = brand {
        prefix = format!("{prefix}/brand/{}", brand.slug);
        breadcrumbs.push(Breadcrumb::new(&brand.name, &prefix));
    }

    let title = match (category, sub_category, brand) {
        (Some(category), Some(sub), Some(brand)) => {
            format!("{} {} - {}", brand.name, sub.name, category.name)
        }
        (Some(category), None, Some(brand)) => format!("{} - {}", brand.name, category.name),
        (Some(category), Some(sub), None) => format!("{} - {}", sub.name, category.name),
        (Some(category), None, None) => category.name.clone(),
        (None, _, Some(brand)) => brand.name.clone(),
        (None, _, None) => DEFAULT_PAGE_TITLE.to_string(),
    };

    (breadcrumbs, title)
}
