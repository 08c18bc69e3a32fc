pub mod memory;
pub mod postgrest;
pub mod store;
pub mod supabase;

pub use memory::MemoryStore;
pub use postgrest::SupabaseStore;
pub use store::{ClinicStore, StoreError, StoreResult};

use std::sync::Arc;

use shared_config::AppConfig;
use tracing::info;

/// Picks the Supabase backend when it is configured, the in-memory one otherwise.
pub fn store_from_config(config: &AppConfig) -> Arc<dyn ClinicStore> {
    if config.is_supabase_configured() {
        info!("Using Supabase store at {}", config.supabase_url);
        Arc::new(SupabaseStore::new(config))
    } else {
        info!("Using in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    }
}
