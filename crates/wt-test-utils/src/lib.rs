//! # WT Test Utilities
//!
//! Shared test utilities for the warm transfer service.
//!
//! This crate provides:
//! - Server test harness (`TestWtServer` for E2E tests)
//! - Fixed room-service credentials and config builders (`fixtures`)
//! - Room token assertions (`RoomTokenAssertions`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wt_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let server = TestWtServer::spawn().await?;
//!
//!     let response = reqwest::get(format!(
//!         "{}/token?identity=agent-1&room=support-42",
//!         server.url()
//!     ))
//!     .await?;
//!
//!     let body: serde_json::Value = response.json().await?;
//!     body["token"]
//!         .as_str()
//!         .unwrap()
//!         .assert_valid_room_token()
//!         .assert_for_identity("agent-1")
//!         .assert_for_room("support-42");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use server_harness::*;
