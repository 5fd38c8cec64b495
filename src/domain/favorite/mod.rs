pub mod entity;

pub use entity::FavoriteRecord;
