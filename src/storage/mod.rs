pub mod links;
pub mod records;
