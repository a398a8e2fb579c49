pub mod bingo_claims;
pub mod cards;
pub mod draws;
pub mod events;
pub mod subcard_cells;
pub mod subcards;
pub mod winners;

pub use bingo_claims as bingo_claim_entity;
pub use cards as card_entity;
pub use draws as draw_entity;
pub use events as event_entity;
pub use events::EventStatus;
pub use subcard_cells as subcard_cell_entity;
pub use subcard_cells::FREE_SPACE;
pub use subcards as subcard_entity;
pub use winners as winner_entity;
