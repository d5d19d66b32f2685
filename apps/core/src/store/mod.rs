//! Key-Value Store — the portal's only persistence mechanism.
//!
//! Models the browser `localStorage` contract the original portal was
//! built on: string keys, string values, synchronous full writes, a
//! single writer. Higher components serialize their state to JSON text
//! and read it back through this port.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

/// Storage port shared by every stateful component as `Arc<dyn KeyValueStore>`.
///
/// No transactions, no expiry, no size limits. `remove` exists because
/// logout deletes the session key rather than writing an empty value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Persisted key layout. Kept byte-compatible with the original portal so
/// state written by one implementation is readable by the other.
pub mod keys {
    /// JSON array of `Account`.
    pub const USERS_DB: &str = "skillup_users_db";
    /// JSON array of `CertificateRecord` — the one canonical certificate list.
    pub const GLOBAL_CERTS: &str = "skillup_global_certs";
    /// JSON `Account` of the logged-in user, absent when logged out.
    pub const SESSION_USER: &str = "skillup_user";
    /// Raw API key string for the AI collaborator.
    pub const GEMINI_API_KEY: &str = "gemini_api_key";

    /// Per-user resume document key.
    pub fn resume(email: &str) -> String {
        format!("skillup_resume_{email}")
    }
}
