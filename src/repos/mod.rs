pub mod category_repo;
pub mod error;
pub mod order_repo;
pub mod product_repo;
pub mod store;
pub mod user_repo;

pub use store::Store;
