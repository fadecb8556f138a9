use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Number;
use std::time::Duration;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const LANGUAGE: &str = "ru-RU";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Сколько фильмов показывает /top.
pub const TOP_LIMIT: usize = 10;
/// Случайный фильм берётся с одной из первых `MAX_PAGE` страниц популярного.
pub const MAX_PAGE: u32 = 5;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("ничего не найдено")]
    NotFound,
    #[error("TMDB ответил статусом {}", .0.as_u16())]
    Api(StatusCode),
    #[error("запрос к TMDB не удался: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Клиент с другим корнем API (прокси, локальная заглушка).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    /// Первый результат поиска по названию (RU).
    pub async fn search(&self, query: &str) -> Result<MovieSummary, LookupError> {
        let url = format!(
            "{}/search/movie?api_key={}&query={}&language={}&include_adult=false&page=1",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query),
            LANGUAGE
        );
        tracing::debug!(query = %query, "tmdb search");
        self.fetch_results(url)
            .await?
            .into_iter()
            .next()
            .map(MovieSummary::from)
            .ok_or(LookupError::NotFound)
    }

    /// Страница популярного, не больше `TOP_LIMIT` фильмов в порядке TMDB.
    /// Номер страницы приводится к 1..=MAX_PAGE. Пустая страница даёт `Ok(vec![])`.
    pub async fn popular_page(&self, page: u32) -> Result<Vec<MovieSummary>, LookupError> {
        let mut results = self.popular_results(page.clamp(1, MAX_PAGE)).await?;
        results.truncate(TOP_LIMIT);
        Ok(results.into_iter().map(MovieSummary::from).collect())
    }

    /// Случайный фильм из популярного: случайная страница, затем случайный фильм на ней.
    pub async fn random_popular(&self) -> Result<MovieSummary, LookupError> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.random_popular_with(&mut rng).await
    }

    pub async fn random_popular_with<R: Rng>(&self, rng: &mut R) -> Result<MovieSummary, LookupError> {
        let page = rng.random_range(1..=MAX_PAGE);
        let results = self.popular_results(page).await?;
        results
            .choose(rng)
            .cloned()
            .map(MovieSummary::from)
            .ok_or(LookupError::NotFound)
    }

    async fn popular_results(&self, page: u32) -> Result<Vec<Movie>, LookupError> {
        let url = format!(
            "{}/movie/popular?api_key={}&language={}&page={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            LANGUAGE,
            page
        );
        tracing::debug!(page, "tmdb popular");
        self.fetch_results(url).await
    }

    async fn fetch_results(&self, url: String) -> Result<Vec<Movie>, LookupError> {
        let resp = self.http.get(url).timeout(REQUEST_TIMEOUT).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Api(status));
        }
        let data: ResultsResp = resp.json().await?;
        Ok(data.results)
    }
}

/// То, что бот показывает о фильме. Любое поле может отсутствовать.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub title: Option<String>,
    /// Первые четыре символа даты выхода.
    pub release_year: Option<String>,
    /// Средняя оценка в том виде, в каком её прислал TMDB.
    pub rating: Option<Number>,
}

impl From<Movie> for MovieSummary {
    fn from(m: Movie) -> Self {
        let release_year = m
            .release_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| d.graphemes(true).take(4).collect::<String>());
        Self {
            title: m.title.filter(|t| !t.trim().is_empty()),
            release_year,
            rating: m.vote_average,
        }
    }
}

/* ======= DTOs ======= */

#[derive(Deserialize, Debug)]
struct ResultsResp {
    results: Vec<Movie>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Movie {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<Number>,
}
