// src/services/sort_engine.rs
//
// Deferred re-sorting of the category lists.
//
// Pure and deterministic: one comparator per sort mode, shared by every list
// it is applied to. Sorting is stable, so elements with equal keys keep their
// prior relative order, identically across all lists sorted in one step.

use std::cmp::Ordering;

use crate::domain::{MovieSummary, SortMode};
use crate::util;

/// Stable in-place sort by the comparator for `mode`.
pub fn sort_movies(movies: &mut [MovieSummary], mode: SortMode) {
    movies.sort_by(|a, b| compare(mode, a, b));
}

/// The shared comparator. Descending modes reverse the comparison, not the
/// list, so stability is preserved.
pub fn compare(mode: SortMode, a: &MovieSummary, b: &MovieSummary) -> Ordering {
    match mode {
        SortMode::RatingAscending => cmp_rating(a, b),
        SortMode::RatingDescending => cmp_rating(a, b).reverse(),
        SortMode::ReleaseAscending => cmp_release(a, b),
        SortMode::ReleaseDescending => cmp_release(a, b).reverse(),
    }
}

/// Absent ratings sort as the lowest key.
fn cmp_rating(a: &MovieSummary, b: &MovieSummary) -> Ordering {
    match (a.average_rating, b.average_rating) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

/// Release key: the parsed 4-character year prefix. Absent, short or
/// non-numeric dates sort as the lowest key (`None < Some` for Option).
fn release_year(movie: &MovieSummary) -> Option<i32> {
    util::year_prefix(movie.release_date.as_deref()).parse().ok()
}

fn cmp_release(a: &MovieSummary, b: &MovieSummary) -> Ordering {
    release_year(a).cmp(&release_year(b))
}
