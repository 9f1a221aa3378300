pub mod store;
pub mod types;

pub use types::{Avatar, AvatarUpdate, NewAvatar};
