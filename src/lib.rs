//! Hospital System Navigator: a conversational front desk that routes each
//! request to one of four specialist agents through a hosted language model.

pub mod agent;
pub mod config_manager;
pub mod conversations;
pub mod error;
pub mod handlers;
pub mod presentation;
pub mod routes;
pub mod state;
pub mod websocket;

pub use error::{NavigatorError, Result};
