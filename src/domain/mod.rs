pub mod category;
pub mod errors;
pub mod item;
pub mod member;
pub mod order;
pub mod ports;

pub use errors::DomainError;
