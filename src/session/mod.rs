/*!
 * Session management module.
 *
 * This module provides:
 * - Server-side storage of the logged-in username per client
 * - Opaque cookie tokens that carry no identity data
 * - Idle expiry and cleanup
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::SessionManager;
pub use models::{SessionEntry, SessionToken};
