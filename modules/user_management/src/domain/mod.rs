pub mod error;
pub mod log_service;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{DomainError, ErrorKind};
pub use log_service::LogService;
pub use service::UserService;
pub use store::{Record, RecordStore, StoreError, UniqueKey};
