pub mod auth_ctx;
pub mod object_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use object_id::{ObjectId, parse_object_id};
