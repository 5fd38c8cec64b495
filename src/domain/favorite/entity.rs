use chrono::Utc;

use crate::domain::movie::{MovieDetail, MovieSummary};

/// A favorite as persisted in the local store.
///
/// `external_id` (the remote catalog id) is the natural key: inserting a
/// duplicate is a silent no-op at the repository level. `local_id` is the
/// store-assigned row id and is never meaningful outside the store.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteRecord {
    pub local_id: i64,
    pub external_id: Option<i64>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub average_rating: Option<f32>,
    pub saved_at: i64,
}

impl FavoriteRecord {
    /// Build a record from a list entry, stamped with the current time.
    pub fn from_summary(movie: &MovieSummary) -> Self {
        Self {
            local_id: 0,
            external_id: movie.id,
            poster_path: movie.poster_path.clone(),
            release_date: movie.release_date.clone(),
            average_rating: movie.average_rating,
            saved_at: Utc::now().timestamp_millis(),
        }
    }

    /// Build a record from a detail payload, stamped with the current time.
    pub fn from_detail(movie: &MovieDetail) -> Self {
        Self {
            local_id: 0,
            external_id: movie.id,
            poster_path: movie.poster_path.clone(),
            release_date: movie.release_date.clone(),
            average_rating: movie.vote_average,
            saved_at: Utc::now().timestamp_millis(),
        }
    }

    /// Map back to the shape used for remote results, for the favorites view.
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.external_id,
            poster_path: self.poster_path.clone(),
            release_date: self.release_date.clone(),
            average_rating: self.average_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> MovieSummary {
        MovieSummary {
            id: Some(1),
            poster_path: Some("/p.jpg".to_string()),
            release_date: Some("2020-05-01".to_string()),
            average_rating: Some(7.2),
        }
    }

    #[test]
    fn test_summary_round_trip() {
        let summary = sample_summary();
        let record = FavoriteRecord::from_summary(&summary);
        assert_eq!(record.to_summary(), summary);
    }

    #[test]
    fn test_from_detail_maps_vote_average() {
        let detail = MovieDetail {
            id: Some(9),
            backdrop_path: None,
            poster_path: Some("/d.jpg".to_string()),
            title: Some("Title".to_string()),
            tagline: None,
            release_date: Some("1999-03-31".to_string()),
            vote_average: Some(8.7),
            vote_count: Some(100),
            genres: Vec::new(),
            overview: None,
        };

        let record = FavoriteRecord::from_detail(&detail);
        assert_eq!(record.external_id, Some(9));
        assert_eq!(record.average_rating, Some(8.7));
        assert_eq!(record.release_date.as_deref(), Some("1999-03-31"));
    }

    #[test]
    fn test_records_are_timestamped() {
        let record = FavoriteRecord::from_summary(&sample_summary());
        assert!(record.saved_at > 0);
    }
}
