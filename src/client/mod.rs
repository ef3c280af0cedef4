pub mod dashboard;
pub mod relay;
pub mod session;
pub mod sync_bridge;
pub mod token_store;

pub use dashboard::{DashboardClient, TokenRejected};
pub use relay::{Relay, RelayMessage, RelayRequest, RelayResponse};
pub use session::NoteSession;
pub use sync_bridge::{SyncBridge, SyncEvent, SyncListener, SyncStatus, sync_status};
pub use token_store::{FileStore, KeyValueStore, MemoryStore, StoreError, TokenStore};
