//! Agent-side and dashboard-side clients of the hub.
//!
//! [`logger`] is the write side: fire-and-forget HTTP posters an automation
//! agent calls after each action. [`hooks`] is the read side: data accessors
//! for an embedded dashboard, with a static [`sample`] dataset substituted
//! when the store is empty so a first paint is never blank.

pub mod hooks;
pub mod logger;
pub mod sample;

pub use hooks::{DashboardHooks, HookData, ResultCache};
pub use logger::ActivityLogger;
