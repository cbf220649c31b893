mod auth;
mod store;

pub use auth::ACCESS_TOKEN_KEY;
pub use auth::REFRESH_TOKEN_KEY;
pub use auth::TokenError;
pub use auth::TokenManager;
pub use store::FileStore;
pub use store::KeyValueStore;
pub use store::STORE_FILE;
pub use store::StoreError;
pub use store::is_expired;
