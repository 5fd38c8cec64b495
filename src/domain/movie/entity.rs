use serde::{Deserialize, Serialize};

/// One movie as it appears in a category, search result or favorites list.
///
/// Field names mirror the remote wire format where they match; `average_rating`
/// is mapped from the remote `vote_average` field. Every field is optional —
/// the remote service omits fields freely and the core never invents values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: Option<i64>,

    pub poster_path: Option<String>,

    pub release_date: Option<String>,

    #[serde(rename = "vote_average")]
    pub average_rating: Option<f32>,
}

/// Full detail payload for a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: Option<i64>,

    pub backdrop_path: Option<String>,

    pub poster_path: Option<String>,

    pub title: Option<String>,

    pub tagline: Option<String>,

    pub release_date: Option<String>,

    pub vote_average: Option<f32>,

    pub vote_count: Option<i64>,

    #[serde(default)]
    pub genres: Vec<Genre>,

    pub overview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<i64>,
    pub name: Option<String>,
}
