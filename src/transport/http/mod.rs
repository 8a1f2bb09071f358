pub mod router;
pub mod types;
pub mod handlers {
    pub mod clicks;
    pub mod common;
    pub mod dogs;
    pub mod health;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
