use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::order_repo::OrderDoc;

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    /// Product id.
    pub product: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderItemRequest>,
    pub shipping_address1: String,
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.order_items.is_empty() {
            return Err("orderItems must not be empty");
        }
        if self.order_items.iter().any(|i| i.quantity == 0) {
            return Err("quantity must be >= 1");
        }
        for (value, message) in [
            (&self.shipping_address1, "shippingAddress1 is required"),
            (&self.city, "city is required"),
            (&self.zip, "zip is required"),
            (&self.country, "country is required"),
            (&self.phone, "phone is required"),
        ] {
            if value.trim().is_empty() {
                return Err(message);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: String,
}

impl UpdateOrderRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let status = self.status.trim();
        if status.is_empty() || status.len() > 32 {
            return Err("status must be 1..=32 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user: String,
    pub order_items: Vec<OrderItemResponse>,
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

impl From<OrderDoc> for OrderResponse {
    fn from(doc: OrderDoc) -> Self {
        Self {
            id: doc.id,
            user: doc.user_id,
            order_items: doc
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
            shipping_address1: doc.shipping_address1,
            shipping_address2: doc.shipping_address2,
            city: doc.city,
            zip: doc.zip,
            country: doc.country,
            phone: doc.phone,
            status: doc.status,
            total_price: doc.total_price,
            date_ordered: doc.date_ordered,
        }
    }
}
