use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog entity (category, subcategory, or brand) in its canonical shape.
///
/// Upstream services deliver this in several looser shapes (a bare id, a
/// populated object, or an array of either). Those are normalized into this
/// one shape at the collaborator boundary via [`loose_entity`]; core code
/// never re-checks the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntity {
    pub id: String,
    pub name: String,
    pub slug: String,
}

impl CatalogEntity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }

    /// An entity known only by id, as delivered by upstreams that send the
    /// bare identifier instead of the populated object.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            slug: String::new(),
        }
    }
}

/// Serde adapter normalizing the loose upstream shapes of an entity field.
///
/// Accepts `null`, `"c1"`, `{"id": ...}`, `["c1", ...]`, or
/// `[{"id": ...}, ...]`; arrays collapse to their first element.
pub mod loose_entity {
    use super::CatalogEntity;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Id(String),
        Entity(CatalogEntity),
        Many(Vec<Loose>),
    }

    fn flatten(loose: Loose) -> Option<CatalogEntity> {
        match loose {
            Loose::Id(id) => {
                if id.is_empty() {
                    None
                } else {
                    Some(CatalogEntity::id_only(id))
                }
            }
            Loose::Entity(entity) => Some(entity),
            Loose::Many(entries) => entries.into_iter().find_map(flatten),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CatalogEntity>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let loose = Option::<Loose>::deserialize(deserializer)?;
        Ok(loose.and_then(flatten))
    }
}

/// A product as returned by the listing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "loose_entity::deserialize")]
    pub category: Option<CatalogEntity>,
    #[serde(default, deserialize_with = "loose_entity::deserialize")]
    pub brand: Option<CatalogEntity>,
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListingPage {
    pub items: Vec<Product>,
    pub total_pages: u32,
    pub total_count: u64,
}
