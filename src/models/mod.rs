pub mod card;
pub mod claim;
pub mod common;
pub mod draw;
pub mod event;

pub use card::*;
pub use claim::*;
pub use common::*;
pub use draw::*;
pub use event::*;

pub use crate::utils::pagination::{PaginatedResponse, PaginationParams};
