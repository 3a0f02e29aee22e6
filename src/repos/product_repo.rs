/*
 * Responsibility
 * - products collection CRUD + count / featured queries
 * - category references are checked by the handler before writes
 */
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::store::{Document, Store};

#[derive(Debug, Clone)]
pub struct ProductDoc {
    pub id: Uuid,
    pub fields: ProductFields,
    pub date_created: DateTime<Utc>,
}

/// Everything a client may set on a product.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    pub brand: String,
    pub price: f64,
    pub category_id: Uuid,
    pub count_in_stock: u32,
    pub rating: f64,
    pub num_reviews: u32,
    pub is_featured: bool,
}

impl Document for ProductDoc {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// `categories`: when given, only products in one of these categories.
pub fn list(store: &Store, categories: Option<&[Uuid]>) -> Result<Vec<ProductDoc>, RepoError> {
    store.products.find(|p| match categories {
        Some(ids) => ids.contains(&p.fields.category_id),
        None => true,
    })
}

pub fn get(store: &Store, id: Uuid) -> Result<Option<ProductDoc>, RepoError> {
    store.products.find_by_id(id)
}

pub fn create(store: &Store, fields: ProductFields) -> Result<ProductDoc, RepoError> {
    store.products.insert(ProductDoc {
        id: Uuid::new_v4(),
        fields,
        date_created: Utc::now(),
    })
}

pub fn update(
    store: &Store,
    id: Uuid,
    fields: ProductFields,
) -> Result<Option<ProductDoc>, RepoError> {
    store.products.update(id, |doc| doc.fields = fields)
}

pub fn delete(store: &Store, id: Uuid) -> Result<bool, RepoError> {
    Ok(store.products.remove(id)?.is_some())
}

pub fn count(store: &Store) -> Result<usize, RepoError> {
    store.products.count(|_| true)
}

pub fn featured(store: &Store, limit: usize) -> Result<Vec<ProductDoc>, RepoError> {
    let mut rows = store.products.find(|p| p.fields.is_featured)?;
    rows.truncate(limit);
    Ok(rows)
}
