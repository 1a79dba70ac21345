// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::model::{Log, LogAction, NewLog, NewUser, User};

// === MODULE DEFINITION ===
pub mod module;
pub use module::UserManagement;

pub mod config;
pub use config::UserManagementConfig;

// === INTERNAL MODULES ===
// Exposed for wiring and tests. Other crates should go through `module` and `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
