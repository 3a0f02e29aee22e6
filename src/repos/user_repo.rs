/*
 * Responsibility
 * - users collection CRUD + lookup by email for login
 * - email is unique (case-insensitive)
 * - password_hash never leaves the service layer (DTOs omit it)
 */
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::store::{Document, Store};

#[derive(Debug, Clone)]
pub struct UserDoc {
    pub id: Uuid,
    pub fields: UserFields,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    pub street: String,
    pub apartment: String,
    pub zip: String,
    pub city: String,
    pub country: String,
}

impl Document for UserDoc {
    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn list(store: &Store) -> Result<Vec<UserDoc>, RepoError> {
    store.users.find(|_| true)
}

pub fn get(store: &Store, id: Uuid) -> Result<Option<UserDoc>, RepoError> {
    store.users.find_by_id(id)
}

pub fn find_by_email(store: &Store, email: &str) -> Result<Option<UserDoc>, RepoError> {
    store
        .users
        .find_one(|u| u.fields.email.eq_ignore_ascii_case(email))
}

pub fn create(
    store: &Store,
    fields: UserFields,
    password_hash: String,
) -> Result<UserDoc, RepoError> {
    let email = fields.email.clone();
    store.users.insert_unique(
        UserDoc {
            id: Uuid::new_v4(),
            fields,
            password_hash,
        },
        "email",
        |u| u.fields.email.eq_ignore_ascii_case(&email),
    )
}

/// `password_hash`: `None` keeps the stored hash.
pub fn update(
    store: &Store,
    id: Uuid,
    fields: UserFields,
    password_hash: Option<String>,
) -> Result<Option<UserDoc>, RepoError> {
    let email = fields.email.clone();
    store.users.update_unique(
        id,
        "email",
        |u| u.fields.email.eq_ignore_ascii_case(&email),
        |doc| {
            doc.fields = fields;
            if let Some(hash) = password_hash {
                doc.password_hash = hash;
            }
        },
    )
}

pub fn delete(store: &Store, id: Uuid) -> Result<bool, RepoError> {
    Ok(store.users.remove(id)?.is_some())
}

pub fn count(store: &Store) -> Result<usize, RepoError> {
    store.users.count(|_| true)
}
