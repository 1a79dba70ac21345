pub mod memory;
pub mod seed;
pub mod storage;

pub use memory::InMemoryStore;
pub use storage::sea_orm_store::SeaOrmStore;
