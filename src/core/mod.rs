//! Core game types and entities

pub mod card;
pub mod entity;
pub mod keyword;
pub mod player;
pub mod types;

pub use card::{Card, CardType, PlayedVia, TriggerEvent};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use keyword::{EffectFamilyTag, Keyword, TargetGroup};
pub use player::Player;
pub use types::{CardName, PlayerName};

/// Strongly-typed ID for Player entities
pub type PlayerId = EntityId<Player>;

/// Strongly-typed ID for Card entities
pub type CardId = EntityId<Card>;
