use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::category_repo::CategoryDoc;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl CategoryRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.len() > 100 {
            return Err("name must be <= 100 chars");
        }
        if let Some(color) = &self.color
            && color.len() > 32
        {
            return Err("color must be <= 32 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<CategoryDoc> for CategoryResponse {
    fn from(doc: CategoryDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            icon: doc.icon,
            color: doc.color,
        }
    }
}
