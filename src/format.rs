//! Тексты ответов бота. Отсутствующее поле всегда заменяется заглушкой.

use crate::tmdb::MovieSummary;

const NO_TITLE: &str = "Без названия";
const NO_YEAR: &str = "неизвестен";
const NO_RATING: &str = "нет данных";
const NA: &str = "N/A";

pub const TOP_HEADER: &str = "Топ-10 популярных фильмов (TMDB):";
pub const RANDOM_HEADER: &str = "Случайный фильм:";

fn title(m: &MovieSummary) -> &str {
    m.title.as_deref().unwrap_or(NO_TITLE)
}

fn rating_or(m: &MovieSummary, placeholder: &str) -> String {
    m.rating
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Название, год и рейтинг, по строке на каждое.
pub fn movie(m: &MovieSummary) -> String {
    format!(
        "{}\nГод: {}\nРейтинг: {}",
        title(m),
        m.release_year.as_deref().unwrap_or(NO_YEAR),
        rating_or(m, NO_RATING)
    )
}

pub fn random_movie(m: &MovieSummary) -> String {
    format!("{RANDOM_HEADER}\n\n{}", movie(m))
}

/// Одна строка списка: `"{rank}. {title} ({year}) ★ {rating}"`.
pub fn top_line(rank: usize, m: &MovieSummary) -> String {
    format!(
        "{}. {} ({}) ★ {}",
        rank,
        title(m),
        m.release_year.as_deref().unwrap_or(NA),
        rating_or(m, NA)
    )
}

/// Нумерация с единицы, порядок входного списка сохраняется.
/// Для пустого списка `None`.
pub fn top_list(movies: &[MovieSummary]) -> Option<String> {
    if movies.is_empty() {
        return None;
    }
    let lines: Vec<String> = movies
        .iter()
        .enumerate()
        .map(|(i, m)| top_line(i + 1, m))
        .collect();
    Some(format!("{TOP_HEADER}\n\n{}", lines.join("\n")))
}
