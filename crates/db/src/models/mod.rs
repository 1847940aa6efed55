pub mod compound;
pub mod links;
pub mod search;
