//! Request handlers, one module per resource family.

pub mod destinations;
pub mod information;
pub mod messages;
pub mod permissions;
pub mod subscriptions;
