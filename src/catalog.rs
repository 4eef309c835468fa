// Read-only queries over an in-memory catalog: search, sort, filter,
// statistics and random pick. Nothing here touches storage or the
// terminal, the UI layer prints the results.

use crate::fuzzy;
use crate::movie::{Catalog, Movie};
use rand::seq::IteratorRandom;
use rand::Rng;
use std::cmp::Ordering;

/// A catalog entry borrowed as `(title, movie)`.
pub type Entry<'a> = (&'a str, &'a Movie);

#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Titles containing the query, case-insensitively.
    Matches(Vec<Entry<'a>>),
    /// No substring match, but these titles are similar enough.
    Suggestions(Vec<&'a str>),
    NotFound,
}

pub fn search<'a>(movies: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    let needle = query.to_lowercase();
    let matches: Vec<Entry> = entries(movies)
        .filter(|(title, _)| title.to_lowercase().contains(&needle))
        .collect();
    if !matches.is_empty() {
        return SearchOutcome::Matches(matches);
    }

    let suggestions: Vec<&str> = fuzzy::suggestions(query, movies.keys().map(String::as_str))
        .into_iter()
        .map(|(title, _)| title)
        .collect();
    if suggestions.is_empty() {
        SearchOutcome::NotFound
    } else {
        SearchOutcome::Suggestions(suggestions)
    }
}

pub fn entries(movies: &Catalog) -> impl Iterator<Item = Entry<'_>> {
    movies.iter().map(|(title, movie)| (title.as_str(), movie))
}

fn sorted_by<'a, F>(movies: &'a Catalog, descending: bool, cmp: F) -> Vec<Entry<'a>>
where
    F: Fn(&Movie, &Movie) -> Ordering,
{
    let mut sorted: Vec<Entry> = entries(movies).collect();
    // stable: equal keys stay in catalog order either way
    sorted.sort_by(|a, b| {
        let ord = cmp(a.1, b.1);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
    sorted
}

pub fn sort_by_rating(movies: &Catalog, descending: bool) -> Vec<Entry<'_>> {
    sorted_by(movies, descending, |a, b| a.rating.total_cmp(&b.rating))
}

pub fn sort_by_year(movies: &Catalog, descending: bool) -> Vec<Entry<'_>> {
    sorted_by(movies, descending, |a, b| a.year.cmp(&b.year))
}

/// Optional constraints combined with AND; `None` means unconstrained.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    pub min_rating: Option<f64>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl Filter {
    pub fn matches(&self, movie: &Movie) -> bool {
        self.min_rating.map_or(true, |min| movie.rating >= min)
            && self.start_year.map_or(true, |start| movie.year >= start)
            && self.end_year.map_or(true, |end| movie.year <= end)
    }

    pub fn apply<'a>(&self, movies: &'a Catalog) -> Vec<Entry<'a>> {
        entries(movies).filter(|(_, m)| self.matches(m)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub average: f64,
    pub median: f64,
    pub best: (String, f64),
    pub worst: (String, f64),
}

/// `None` for an empty catalog.
pub fn stats(movies: &Catalog) -> Option<Stats> {
    let by_rating = sort_by_rating(movies, false);
    let (worst_title, worst) = by_rating.first()?;
    let (best_title, best) = by_rating.last()?;

    let ratings: Vec<f64> = by_rating.iter().map(|(_, m)| m.rating).collect();
    let n = ratings.len();
    let average = ratings.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        ratings[n / 2]
    } else {
        (ratings[n / 2 - 1] + ratings[n / 2]) / 2.0
    };

    Some(Stats {
        average,
        median,
        best: (best_title.to_string(), best.rating),
        worst: (worst_title.to_string(), worst.rating),
    })
}

pub fn random_movie<'a, R: Rng + ?Sized>(movies: &'a Catalog, rng: &mut R) -> Option<Entry<'a>> {
    entries(movies).choose(rng)
}

pub fn ratings(movies: &Catalog) -> Vec<f64> {
    movies.values().map(|m| m.rating).collect()
}
