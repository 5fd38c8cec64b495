pub mod entity;

pub use entity::{Genre, MovieDetail, MovieSummary};
