use serde::{Deserialize, Serialize};

/// Count for a named value (genre, director, content type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

/// Count for a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Share of one content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShare {
    pub content_type: String,
    pub count: usize,
    /// Percentage of titles with a known type.
    pub percent: f64,
}

/// A rated title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedTitle {
    pub title: String,
    pub rating: f64,
}

/// Titles added per year for one genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTrend {
    pub genre: String,
    /// Ascending by year.
    pub per_year: Vec<YearCount>,
}

/// Aggregate view of a cleaned catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total_titles: usize,
    /// Descending by count.
    pub content_types: Vec<TypeShare>,
    pub top_genres: Vec<RankedCount>,
    /// Ascending by year.
    pub additions_per_year: Vec<YearCount>,
    /// Descending by rating, ties by title.
    pub top_rated: Vec<RatedTitle>,
    pub top_directors: Vec<RankedCount>,
    /// One entry per top genre, in ranking order.
    pub genre_trends: Vec<GenreTrend>,
    /// Descending by count, ties by year.
    pub top_release_years: Vec<YearCount>,
}
