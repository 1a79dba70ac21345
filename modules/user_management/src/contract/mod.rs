pub mod model;

pub use model::{Log, LogAction, NewLog, NewUser, User};
