//! API route modules.

pub mod avatar;
pub mod webhook;
