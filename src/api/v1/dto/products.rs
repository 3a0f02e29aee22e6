use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::v1::dto::categories::CategoryResponse;
use crate::repos::product_repo::{ProductDoc, ProductFields};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rich_description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    pub price: f64,
    /// Category id; must reference an existing category.
    pub category: String,
    pub count_in_stock: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub is_featured: bool,
}

impl ProductRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must be a non-negative number");
        }
        if self.count_in_stock > 255 {
            return Err("countInStock must be between 0 and 255");
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err("rating must be between 0 and 5");
        }
        Ok(())
    }

    pub fn into_fields(self, category_id: Uuid) -> ProductFields {
        ProductFields {
            name: self.name,
            description: self.description,
            rich_description: self.rich_description,
            image: self.image,
            brand: self.brand,
            price: self.price,
            category_id,
            count_in_stock: self.count_in_stock,
            rating: self.rating,
            num_reviews: self.num_reviews,
            is_featured: self.is_featured,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Comma-separated category ids, e.g. `?categories=a,b`.
    pub categories: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rich_description: String,
    pub image: String,
    pub brand: String,
    pub price: f64,
    /// Populated category; `null` once the category has been deleted.
    pub category: Option<CategoryResponse>,
    pub count_in_stock: u32,
    pub rating: f64,
    pub num_reviews: u32,
    pub is_featured: bool,
    pub date_created: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(doc: ProductDoc, category: Option<CategoryResponse>) -> Self {
        let f = doc.fields;
        Self {
            id: doc.id,
            name: f.name,
            description: f.description,
            rich_description: f.rich_description,
            image: f.image,
            brand: f.brand,
            price: f.price,
            category,
            count_in_stock: f.count_in_stock,
            rating: f.rating,
            num_reviews: f.num_reviews,
            is_featured: f.is_featured,
            date_created: doc.date_created,
        }
    }
}
