pub mod catalog_repo;
pub mod compound_repo;
pub mod links_repo;
pub mod search_repo;

pub use catalog_repo::{CatalogRepo, GrantRole, InvalidRole};
pub use compound_repo::CompoundRepo;
pub use links_repo::{LinksRepo, LookupError};
pub use search_repo::SearchRepo;
