//! # Pricing Forms
//!
//! Terminal front end for the option and bond pricing forms.
//!
//! ## TUI Mode
//! Uses ratatui for rendering and crossterm for terminal handling.
//!
//! ### Screens
//! - **Option Pricer** (`F1`): Black-Scholes inputs, call/put selection and Greeks
//! - **Bond Pricer** (`F2`): bond inputs, coupon periodicity and the coupon schedule
//!
//! ## Headless Mode
//! `forms-gui option` and `forms-gui bond` fill a page from `--set id=value`
//! and `--check id`, activate it once and print the rendered outputs.

pub mod app;
pub mod config;
pub mod error;
pub mod headless;
pub mod screens;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{FormApp, Screen, TuiApp};
    pub use crate::config::{build_config, CliArgs, GuiConfig};
    pub use crate::error::GuiError;
    pub use crate::headless::{render_page_text, run_form, FormInput, FormKind};
}
