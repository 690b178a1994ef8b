pub mod adventure;
pub mod character;
pub mod game;
pub mod game_character;
pub mod item;
pub mod join_request;
pub mod user;

pub use item::ItemType;
pub use join_request::JoinRequestStatus;
