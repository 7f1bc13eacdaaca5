//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits
//! and an in-memory catalog store, so a full enrichment run can be exercised
//! without network access or files on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelscope_core::testing::{fixtures, MemoryCatalogStore, MockTitleSearch};
//!
//! let search = MockTitleSearch::new();
//! search.set_response("Dick Johnson Is Dead", r#"{"d":[{"id":"tt11394180"}]}"#).await;
//!
//! let store = MemoryCatalogStore::with_catalog(fixtures::streaming_catalog());
//! ```

mod mock_catalog_store;
mod mock_title_detail_source;
mod mock_title_search;

pub use mock_catalog_store::MemoryCatalogStore;
pub use mock_title_detail_source::MockTitleDetailSource;
pub use mock_title_search::{MockTitleSearch, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{columns, Catalog};

    fn cell(value: &str) -> Option<String> {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Catalog with `title`, `release_year`, `title_id` and `ratings`
    /// columns. Empty strings become missing cells.
    pub fn catalog(rows: &[(&str, &str, &str, &str)]) -> Catalog {
        let header = [
            columns::TITLE,
            columns::RELEASE_YEAR,
            columns::TITLE_ID,
            columns::RATINGS,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        let records = rows
            .iter()
            .map(|(title, year, title_id, ratings)| {
                vec![cell(title), cell(year), cell(title_id), cell(ratings)]
            })
            .collect();

        Catalog::from_records(header, records).expect("fixture catalog is rectangular")
    }

    /// Header of the streaming-service export used by [`streaming_csv`].
    pub const STREAMING_HEADER: &str =
        "show_id,type,title,director,country,date_added,release_year,listed_in,title_id,ratings";

    /// A small streaming-service export, already enriched.
    pub fn streaming_csv() -> String {
        let rows = [
            r#"s1,Movie,Dick Johnson Is Dead,Kirsten Johnson,United States,"September 25, 2021",2020,Documentaries,tt11394180,7.4"#,
            r#"s2,TV Show,Blood & Water,,South Africa,"September 24, 2021",2021,"International TV Shows, TV Dramas, TV Mysteries",tt9052870,6.6"#,
            r#"s3,TV Show,Ganglands,Julien Leclercq,,"September 24, 2021",2021,"Crime TV Shows, International TV Shows, TV Action & Adventure",tt13467932,7.2"#,
            r#"s4,Movie,Sankofa,Haile Gerima,United States,"September 24, 2021",1993,"Dramas, Independent Movies, International Movies",tt0108044,7.0"#,
            r#"s5,Movie,The Starling,Theodore Melfi,United States,"September 24, 2021",2021,"Comedies, Dramas",tt5164438,6.3"#,
            r#"s6,Movie,Je Suis Karl,Christian Schwochow,Germany,"September 23, 2021",2021,"Dramas, International Movies",tt9723128,6.3"#,
            r#"s7,Movie,Confessions of an Invisible Girl,Bruno Garotti,,"September 22, 2021",2021,"Children & Family Movies, Comedies",NotFound/Unavailable,NaN"#,
            r#"s8,Movie,Avvai Shanmughi,K.S. Ravikumar,,"January 1, 2020",1996,"Comedies, International Movies",tt0115643,7.5"#,
            r#"s9,TV Show,Kota Factory,,India,"September 24, 2021",2021,"International TV Shows, Romantic TV Shows, TV Comedies",tt9432978,9.1"#,
            r#"s10,Movie,Jeans,S. Shankar,India,"January 1, 2020",1998,"Comedies, International Movies, Romantic Movies",tt0176093,6.8"#,
        ];
        let mut csv = String::from(STREAMING_HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    /// [`streaming_csv`] parsed into a catalog.
    pub fn streaming_catalog() -> Catalog {
        let text = streaming_csv();
        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let header = reader
            .headers()
            .expect("fixture header")
            .iter()
            .map(str::to_string)
            .collect();
        let records = reader
            .records()
            .map(|r| r.expect("fixture record").iter().map(cell).collect())
            .collect();
        Catalog::from_records(header, records).expect("fixture catalog is rectangular")
    }

    /// Minimal title page carrying `rating` in the aggregate-rating markup.
    pub fn title_page_with_rating(rating: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html><head><title>Title - IMDb</title></head><body><div data-testid="hero-rating-bar__aggregate-rating__score"><span class="sc-bde20123-1 iZlgcd">{}</span><span>/10</span></div></body></html>"#,
            rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures;

    #[test]
    fn test_streaming_catalog_matches_csv() {
        let catalog = fixtures::streaming_catalog();

        assert_eq!(catalog.len(), 10);
        assert_eq!(
            catalog.columns().join(","),
            fixtures::STREAMING_HEADER
        );
        assert_eq!(catalog.value(1, "director"), None);
        assert_eq!(catalog.value(0, "date_added"), Some("September 25, 2021"));
    }
}
