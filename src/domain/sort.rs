// src/domain/sort.rs

use serde::{Deserialize, Serialize};

/// Sort orders a user can apply to the category lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    RatingAscending,
    RatingDescending,
    ReleaseAscending,
    ReleaseDescending,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::RatingAscending,
        SortMode::RatingDescending,
        SortMode::ReleaseAscending,
        SortMode::ReleaseDescending,
    ];

    /// Human-readable label for calling screens.
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::RatingAscending => "Rating ascending",
            SortMode::RatingDescending => "Rating descending",
            SortMode::ReleaseAscending => "Release date ascending",
            SortMode::ReleaseDescending => "Release date descending",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
