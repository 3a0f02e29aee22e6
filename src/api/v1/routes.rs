/*
 * Responsibility
 * - URL structure of v1 (nested under Config::api_prefix by app.rs)
 * - Who may call what is not decided here: see services::auth::route_rules
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    categories::{create_category, delete_category, get_category, list_categories, update_category},
    health::health,
    orders::{
        count_orders, create_order, delete_order, get_order, list_orders, total_sales,
        update_order, user_orders,
    },
    products::{
        count_products, create_product, delete_product, featured_products, get_product,
        list_products, update_product,
    },
    users::{
        count_users, create_user, delete_user, get_user, list_users, login, register_user,
        update_user,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/get/count", get(count_products))
        .route("/products/get/featured/{count}", get(featured_products))
        .route("/users", get(list_users).post(create_user))
        .route("/users/login", post(login))
        .route("/users/register", post(register_user))
        .route("/users/get/count", get(count_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/get/count", get(count_orders))
        .route("/orders/get/totalsales", get(total_sales))
        .route("/orders/get/userorders/{user_id}", get(user_orders))
        .route(
            "/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}
