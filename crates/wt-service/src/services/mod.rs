//! Service layer for the warm transfer service.
//!
//! # Components
//!
//! - `token_issuer` - Room token construction and signing
//! - `warm_transfer` - Transfer room naming and token pairs
//! - `llm_client` - HTTP client for the chat-completions API

pub mod llm_client;
pub mod token_issuer;
pub mod warm_transfer;

pub use llm_client::{mock::MockLlmClient, LlmClient, LlmClientTrait};
pub use token_issuer::{IssuedToken, ParticipantGrant, RoomPermissions, TokenIssuer};
pub use warm_transfer::{generate_transfer_room_name, plan_warm_transfer, TransferParties, TransferPlan};
