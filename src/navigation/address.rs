use crate::error::{CoreError, CoreResult};
use crate::filters::FilterCriteria;
use crate::resolver::RouteSlugs;

/// An address split into its raw slugs and the free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub slugs: RouteSlugs,
    pub search: Option<String>,
}

/// Compute the canonical address for the given criteria.
///
/// Grammar: `/shop`, `/category/:c`, `/category/:c/subcategory/:s`,
/// `/category/:c/brand/:b`, `/category/:c/subcategory/:s/brand/:b`,
/// `/brand/:b`. With several brands selected the first entry provides the
/// brand segment. A non-empty search term is carried as `?q=<term>`.
pub fn format_address(criteria: &FilterCriteria) -> String {
    let mut path = String::new();

    if let Some(category) = &criteria.category {
        path.push_str("/category/");
        path.push_str(&category.slug);
        if let Some(sub_category) = &criteria.sub_category {
            path.push_str("/subcategory/");
            path.push_str(&sub_category.slug);
        }
    }
    if let Some(brand) = criteria.brands.first() {
        path.push_str("/brand/");
        path.push_str(&brand.slug);
    }
    if path.is_empty() {
        path.push_str("/shop");
    }

    if !criteria.search.is_empty() {
        path.push_str("?q=");
        path.push_str(&urlencoding::encode(&criteria.search));
    }

    path
}

/// Parse an address produced by (or equivalent to) [`format_address`].
///
/// Paths outside the grammar are rejected; the caller decides whether that
/// means "not a shop route" or a malformed request.
pub fn parse_address(address: &str) -> CoreResult<ParsedAddress> {
    let (path, query) = match address.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (address, None),
    };

    let search = query.and_then(parse_search_term);

    let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    let slugs = match segments.as_slice() {
        [] | ["shop"] => RouteSlugs::default(),
        ["category", category] => RouteSlugs {
            category: Some((*category).to_string()),
            ..RouteSlugs::default()
        },
        ["category", category, "subcategory", sub] => RouteSlugs {
            category: Some((*category).to_string()),
            sub_category: Some((*sub).to_string()),
            brand: None,
        },
        ["category", category, "brand", brand] => RouteSlugs {
            category: Some((*category).to_string()),
            sub_category: None,
            brand: Some((*brand).to_string()),
        },
        ["category", category, "subcategory", sub, "brand", brand] => RouteSlugs {
            category: Some((*category).to_string()),
            sub_category: Some((*sub).to_string()),
            brand: Some((*brand).to_string()),
        },
        ["brand", brand] => RouteSlugs {
            category: None,
            sub_category: None,
            brand: Some((*brand).to_string()),
        },
        _ => {
            return Err(CoreError::InvalidInput(format!(
                "address outside the shop grammar: {address}"
            )))
        }
    };

    Ok(ParsedAddress { slugs, search })
}

fn parse_search_term(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != "q" || value.is_empty() {
            return None;
        }
        match urlencoding::decode(value) {
            Ok(decoded) => Some(decoded.into_owned()),
            Err(error) => {
                tracing::warn!("undecodable q parameter {value}: {error}");
                None
            }
        }
    })
}
