/*
 * Responsibility
 * - In-process document collections (one per resource), keyed by UUID
 * - Stand-in for the external document store; handlers only see repo functions
 * - Locks are held for the duration of a single call and never across `.await`
 */
use std::sync::RwLock;

use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::{
    category_repo::CategoryDoc, order_repo::OrderDoc, product_repo::ProductDoc,
    user_repo::UserDoc,
};

pub trait Document: Clone + Send + Sync {
    fn id(&self) -> Uuid;
}

#[derive(Debug)]
pub struct Collection<T> {
    name: &'static str,
    docs: RwLock<Vec<T>>,
}

impl<T: Document> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: RwLock::new(Vec::new()),
        }
    }

    fn poisoned(&self) -> RepoError {
        RepoError::Poisoned {
            collection: self.name,
        }
    }

    pub fn find(&self, filter: impl Fn(&T) -> bool) -> Result<Vec<T>, RepoError> {
        let docs = self.docs.read().map_err(|_| self.poisoned())?;
        Ok(docs.iter().filter(|d| filter(d)).cloned().collect())
    }

    pub fn find_one(&self, filter: impl Fn(&T) -> bool) -> Result<Option<T>, RepoError> {
        let docs = self.docs.read().map_err(|_| self.poisoned())?;
        Ok(docs.iter().find(|d| filter(d)).cloned())
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        self.find_one(|d| d.id() == id)
    }

    pub fn count(&self, filter: impl Fn(&T) -> bool) -> Result<usize, RepoError> {
        let docs = self.docs.read().map_err(|_| self.poisoned())?;
        Ok(docs.iter().filter(|d| filter(d)).count())
    }

    /// Insert `doc` unless an existing document satisfies `clashes`.
    pub fn insert_unique(
        &self,
        doc: T,
        field: &'static str,
        clashes: impl Fn(&T) -> bool,
    ) -> Result<T, RepoError> {
        let mut docs = self.docs.write().map_err(|_| self.poisoned())?;
        if docs.iter().any(|d| clashes(d)) {
            return Err(RepoError::Duplicate { field });
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    pub fn insert(&self, doc: T) -> Result<T, RepoError> {
        self.insert_unique(doc, "id", |_| false)
    }

    /// Apply `change` to the document with `id` and return the updated copy.
    pub fn update(&self, id: Uuid, change: impl FnOnce(&mut T)) -> Result<Option<T>, RepoError> {
        self.update_unique(id, "id", |_| false, change)
    }

    /// Like `update`, but fails if any *other* document satisfies `clashes`.
    pub fn update_unique(
        &self,
        id: Uuid,
        field: &'static str,
        clashes: impl Fn(&T) -> bool,
        change: impl FnOnce(&mut T),
    ) -> Result<Option<T>, RepoError> {
        let mut docs = self.docs.write().map_err(|_| self.poisoned())?;
        if docs.iter().any(|d| d.id() != id && clashes(d)) {
            return Err(RepoError::Duplicate { field });
        }
        Ok(docs.iter_mut().find(|d| d.id() == id).map(|doc| {
            change(doc);
            doc.clone()
        }))
    }

    pub fn remove(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let mut docs = self.docs.write().map_err(|_| self.poisoned())?;
        let idx = docs.iter().position(|d| d.id() == id);
        Ok(idx.map(|idx| docs.remove(idx)))
    }
}

/// All collections of the service. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Store {
    pub categories: Collection<CategoryDoc>,
    pub products: Collection<ProductDoc>,
    pub users: Collection<UserDoc>,
    pub orders: Collection<OrderDoc>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            categories: Collection::new("categories"),
            products: Collection::new("products"),
            users: Collection::new("users"),
            orders: Collection::new("orders"),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        text: String,
    }

    impl Document for Note {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn note(text: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            text: text.to_string(),
        }
    }

    #[test]
    fn insert_find_update_remove() {
        let notes = Collection::new("notes");
        let a = notes.insert(note("a")).unwrap();
        notes.insert(note("b")).unwrap();

        assert_eq!(notes.count(|_| true).unwrap(), 2);
        assert_eq!(notes.find_by_id(a.id).unwrap(), Some(a.clone()));

        let updated = notes.update(a.id, |n| n.text = "A".into()).unwrap().unwrap();
        assert_eq!(updated.text, "A");

        assert_eq!(notes.remove(a.id).unwrap().map(|n| n.text), Some("A".to_string()));
        assert_eq!(notes.remove(a.id).unwrap(), None);
        assert_eq!(notes.count(|_| true).unwrap(), 1);
    }

    #[test]
    fn unique_insert_rejects_clash() {
        let notes = Collection::new("notes");
        notes.insert(note("same")).unwrap();
        let err = notes
            .insert_unique(note("same"), "text", |n| n.text == "same")
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate { field: "text" }));
    }

    #[test]
    fn missing_id_updates_nothing() {
        let notes: Collection<Note> = Collection::new("notes");
        assert_eq!(notes.update(Uuid::new_v4(), |n| n.text.clear()).unwrap(), None);
    }
}
