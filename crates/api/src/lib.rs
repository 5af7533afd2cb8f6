//! `medirec-api` — HTTP surface of the credential/permission core.
//!
//! Routes declare their authorization pipeline as composed middleware layers
//! (authentication, then role and/or ownership guards); handlers only map
//! DTOs onto the account service.

pub mod app;
pub mod middleware;
