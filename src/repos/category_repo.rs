/*
 * Responsibility
 * - categories collection CRUD
 */
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::store::{Document, Store};

#[derive(Debug, Clone)]
pub struct CategoryDoc {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl Document for CategoryDoc {
    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn list(store: &Store) -> Result<Vec<CategoryDoc>, RepoError> {
    store.categories.find(|_| true)
}

pub fn get(store: &Store, id: Uuid) -> Result<Option<CategoryDoc>, RepoError> {
    store.categories.find_by_id(id)
}

pub fn create(
    store: &Store,
    name: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<CategoryDoc, RepoError> {
    store.categories.insert(CategoryDoc {
        id: Uuid::new_v4(),
        name: name.to_string(),
        icon: icon.map(str::to_string),
        color: color.map(str::to_string),
    })
}

pub fn update(
    store: &Store,
    id: Uuid,
    name: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<Option<CategoryDoc>, RepoError> {
    store.categories.update(id, |doc| {
        doc.name = name.to_string();
        doc.icon = icon.map(str::to_string);
        doc.color = color.map(str::to_string);
    })
}

pub fn delete(store: &Store, id: Uuid) -> Result<bool, RepoError> {
    Ok(store.categories.remove(id)?.is_some())
}
