pub mod card_service;
pub mod claim_service;
pub mod draw_service;
pub mod event_service;
pub mod notifier;

pub use card_service::*;
pub use claim_service::*;
pub use draw_service::*;
pub use event_service::*;
pub use notifier::*;
