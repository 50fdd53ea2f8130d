//! Application crate: CLI, terminal panel and web panel over one
//! [`panel::Panel`] controller.

pub mod app;
pub mod cli;
pub mod panel;
pub mod web;

pub use cli::{Cli, Commands, ExchangeArgs};
pub use panel::{CallId, Completion, Panel, PanelUpdate, Report};
