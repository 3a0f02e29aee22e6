/*
 * Responsibility
 * - orders collection CRUD + aggregates (count, total sales, per-user listing)
 * - `user_id` is the subject of the caller that placed the order
 */
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::store::{Document, Store};

#[derive(Debug, Clone)]
pub struct OrderItemDoc {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct OrderDoc {
    pub id: Uuid,
    pub user_id: String,
    pub items: Vec<OrderItemDoc>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: String,
    pub total_price: f64,
    pub date_ordered: DateTime<Utc>,
}

impl Document for OrderDoc {
    fn id(&self) -> Uuid {
        self.id
    }
}

fn newest_first(mut rows: Vec<OrderDoc>) -> Vec<OrderDoc> {
    rows.sort_by(|a, b| b.date_ordered.cmp(&a.date_ordered));
    rows
}

pub fn list(store: &Store) -> Result<Vec<OrderDoc>, RepoError> {
    Ok(newest_first(store.orders.find(|_| true)?))
}

pub fn list_for_user(store: &Store, user_id: &str) -> Result<Vec<OrderDoc>, RepoError> {
    Ok(newest_first(store.orders.find(|o| o.user_id == user_id)?))
}

pub fn get(store: &Store, id: Uuid) -> Result<Option<OrderDoc>, RepoError> {
    store.orders.find_by_id(id)
}

pub fn create(store: &Store, order: OrderDoc) -> Result<OrderDoc, RepoError> {
    store.orders.insert(order)
}

pub fn update_status(store: &Store, id: Uuid, status: &str) -> Result<Option<OrderDoc>, RepoError> {
    store.orders.update(id, |doc| doc.status = status.to_string())
}

pub fn delete(store: &Store, id: Uuid) -> Result<bool, RepoError> {
    Ok(store.orders.remove(id)?.is_some())
}

pub fn count(store: &Store) -> Result<usize, RepoError> {
    store.orders.count(|_| true)
}

pub fn total_sales(store: &Store) -> Result<f64, RepoError> {
    Ok(store
        .orders
        .find(|_| true)?
        .iter()
        .map(|o| o.total_price)
        .sum())
}
