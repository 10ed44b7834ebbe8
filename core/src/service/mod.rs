pub mod auth;
pub mod region_sync;
pub mod token;

pub use auth::AuthService;
pub use region_sync::{RegionSyncTask, RegionSynchronizer};
pub use token::{AuthRefreshRequest, AuthTokenPair, TokenManager};
