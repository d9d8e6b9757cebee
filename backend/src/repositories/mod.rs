//! Database repositories, one per persisted entity.
//!
//! Repositories own all SQL for their entity and return plain model structs;
//! business rules live in the service layer above them.

pub mod password_reset_repository;
pub mod revoked_token_repository;
pub mod user_repository;
pub mod verification_token_repository;
