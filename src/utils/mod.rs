pub mod jwt;
pub mod pagination;

pub use jwt::*;
pub use pagination::*;
