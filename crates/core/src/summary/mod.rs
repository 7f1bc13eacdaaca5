//! Catalog summary - the aggregate figures behind the catalog charts.
//!
//! Imputation sentinels and rating markers never count as values here.

mod types;

pub use types::*;

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use crate::catalog::{columns, is_sentinel_for, parse_rating, parse_year, Catalog};

/// Separator between genres in `listed_in` and between names in `director`.
const LIST_SEPARATOR: &str = ", ";

/// Parse a `date_added` cell: "September 25, 2021" or "2021-09-25".
pub fn parse_date_added(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Build the summary; every ranking is cut to `top_n` entries.
/// Absent columns yield empty sections.
pub fn summarize(catalog: &Catalog, top_n: usize) -> CatalogSummary {
    let top_genres = top_genres(catalog, top_n);
    let genre_trends = genre_trends(catalog, &top_genres);

    CatalogSummary {
        total_titles: catalog.len(),
        content_types: content_types(catalog),
        additions_per_year: additions_per_year(catalog),
        top_rated: top_rated(catalog, top_n),
        top_directors: split_ranking(catalog, columns::DIRECTOR, top_n),
        top_release_years: top_release_years(catalog, top_n),
        top_genres,
        genre_trends,
    }
}

/// Present, non-sentinel value of `column` for every row (`None` otherwise).
fn known_values<'a>(catalog: &'a Catalog, column: &str) -> Vec<Option<&'a str>> {
    let Some(index) = catalog.column_index(column) else {
        return vec![None; catalog.len()];
    };
    (0..catalog.len())
        .map(|row| {
            catalog
                .cell(row, index)
                .map(str::trim)
                .filter(|v| !v.is_empty() && !is_sentinel_for(column, v))
        })
        .collect()
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// Sort by count descending; ties keep key order.
fn rank<K: Ord>(counts: BTreeMap<K, usize>, top_n: usize) -> Vec<(K, usize)> {
    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}

fn content_types(catalog: &Catalog) -> Vec<TypeShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in known_values(catalog, columns::TYPE).into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }
    let known: usize = counts.values().sum();

    rank(counts, usize::MAX)
        .into_iter()
        .map(|(content_type, count)| TypeShare {
            content_type: content_type.to_string(),
            count,
            percent: count as f64 * 100.0 / known as f64,
        })
        .collect()
}

fn split_ranking(catalog: &Catalog, column: &str, top_n: usize) -> Vec<RankedCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in known_values(catalog, column).into_iter().flatten() {
        for item in split_list(value).filter(|item| !is_sentinel_for(column, item)) {
            *counts.entry(item).or_default() += 1;
        }
    }

    rank(counts, top_n)
        .into_iter()
        .map(|(name, count)| RankedCount {
            name: name.to_string(),
            count,
        })
        .collect()
}

fn top_genres(catalog: &Catalog, top_n: usize) -> Vec<RankedCount> {
    split_ranking(catalog, columns::LISTED_IN, top_n)
}

fn years_added(catalog: &Catalog) -> Vec<Option<i32>> {
    known_values(catalog, columns::DATE_ADDED)
        .into_iter()
        .map(|v| v.and_then(parse_date_added).map(|d| d.year()))
        .collect()
}

fn year_counts(years: impl Iterator<Item = i32>) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for year in years {
        *counts.entry(year).or_default() += 1;
    }
    counts
}

fn as_year_counts(counts: impl IntoIterator<Item = (i32, usize)>) -> Vec<YearCount> {
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

fn additions_per_year(catalog: &Catalog) -> Vec<YearCount> {
    as_year_counts(year_counts(years_added(catalog).into_iter().flatten()))
}

fn top_rated(catalog: &Catalog, top_n: usize) -> Vec<RatedTitle> {
    let titles = known_values(catalog, columns::TITLE);
    let ratings = known_values(catalog, columns::RATINGS);

    let mut rated: Vec<RatedTitle> = titles
        .into_iter()
        .zip(ratings)
        .filter_map(|(title, rating)| {
            Some(RatedTitle {
                title: title?.to_string(),
                rating: parse_rating(rating?)?,
            })
        })
        .collect();

    rated.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.title.cmp(&b.title))
    });
    rated.truncate(top_n);
    rated
}

/// Titles added per year for each genre, counting every title listed in it.
fn genre_trends(catalog: &Catalog, genres: &[RankedCount]) -> Vec<GenreTrend> {
    let listed_in = known_values(catalog, columns::LISTED_IN);
    let years = years_added(catalog);

    let mut per_genre: HashMap<&str, BTreeMap<i32, usize>> = genres
        .iter()
        .map(|g| (g.name.as_str(), BTreeMap::new()))
        .collect();

    for (listing, year) in listed_in.into_iter().zip(years) {
        let (Some(listing), Some(year)) = (listing, year) else {
            continue;
        };
        for genre in split_list(listing) {
            if let Some(counts) = per_genre.get_mut(genre) {
                *counts.entry(year).or_default() += 1;
            }
        }
    }

    genres
        .iter()
        .map(|g| GenreTrend {
            genre: g.name.clone(),
            per_year: as_year_counts(per_genre.remove(g.name.as_str()).unwrap_or_default()),
        })
        .collect()
}

fn top_release_years(catalog: &Catalog, top_n: usize) -> Vec<YearCount> {
    let years = known_values(catalog, columns::RELEASE_YEAR)
        .into_iter()
        .flatten()
        .filter_map(parse_year);
    as_year_counts(rank(year_counts(years), top_n))
}
