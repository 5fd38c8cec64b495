// src/domain/category.rs

use serde::{Deserialize, Serialize};

/// The four fixed remote movie lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NowPlaying,
        Category::Popular,
        Category::TopRated,
        Category::Upcoming,
    ];

    /// Stable path segment used by the remote catalog service.
    pub fn query_key(&self) -> &'static str {
        match self {
            Category::NowPlaying => "now_playing",
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
        }
    }

    /// Human-readable label for calling screens.
    pub fn label(&self) -> &'static str {
        match self {
            Category::NowPlaying => "Now playing",
            Category::Popular => "Popular",
            Category::TopRated => "Top rated",
            Category::Upcoming => "Upcoming",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
