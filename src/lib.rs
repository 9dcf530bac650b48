//! DealVox backend: turns uploaded contact spreadsheets into deduplicated
//! call records, exports them, and kicks off the calling workflow.

mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
