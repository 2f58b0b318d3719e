//! User notifications
//!
//! A headless alert queue. Renderers subscribe to `alert:shown` and
//! `alert:removed` on the bus.

pub mod alerts;

pub use alerts::{Alert, AlertCenter};
