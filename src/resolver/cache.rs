use std::time::Duration;

use moka::sync::Cache;

use crate::types::CatalogEntity;

/// Cache of resolved slugs keyed by scope. Only successful resolutions are
/// cached; an unknown slug is re-checked on the next transition so newly
/// created catalog entries become visible.
#[derive(Debug, Clone)]
pub struct SlugCache {
    cache: Cache<String, CatalogEntity>,
}

impl SlugCache {
    pub fn new(capacity: u32, ttl_secs: u64) -> Self {
        let max_capacity = if capacity == 0 { 1 } else { capacity as u64 };
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { cache }
    }

    pub fn category_key(slug: &str) -> String {
        format!("category:{slug}")
    }

    pub fn sub_category_key(category_id: &str, slug: &str) -> String {
        format!("sub:{category_id}:{slug}")
    }

    pub fn brand_key(slug: &str) -> String {
        format!("brand:{slug}")
    }

    pub fn get(&self, key: &str) -> Option<CatalogEntity> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, entity: CatalogEntity) {
        self.cache.insert(key, entity);
    }
}
