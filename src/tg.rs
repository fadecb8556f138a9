use crate::format;
use crate::tmdb::{LookupError, TmdbClient};
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    prelude::*,
    utils::command::BotCommands,
};

/* ====== Команды ====== */
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    /// приветствие и список команд
    #[command(description = "приветствие")]
    Start,
    /// помощь
    #[command(description = "эта справка")]
    Help,
    /// поиск по названию, всё после команды идёт в запрос
    #[command(description = "поиск фильма: /search <название>")]
    Search(String),
    /// топ-10 популярных (первая страница)
    #[command(description = "топ-10 TMDB")]
    Top,
    /// случайный фильм с одной из первых страниц популярного
    #[command(description = "случайный фильм из популярных")]
    Random,
}

pub const START_TEXT: &str = "Кино-бот\n\n\
Доступные команды:\n\
/search <название> - Поиск фильма\n\
/top - Топ-10 TMDB\n\
/random - Случайный фильм\n\
/help - Помощь";

pub const HELP_TEXT: &str = "Доступные команды:\n\n\
/search <название> - Поиск фильма\n\
/top - Топ-10 TMDB\n\
/random - Случайный фильм из популярных\n\
/help - Эта справка";

pub const SEARCH_USAGE: &str = "Укажите название фильма после команды /search";
pub const SEARCH_NOT_FOUND: &str = "Фильм не найден на TMDB";
pub const SEARCH_FAILED: &str = "Ошибка при поиске фильма";
pub const TOP_EMPTY: &str = "Не удалось получить топ фильмов";
pub const TOP_FAILED: &str = "Ошибка при получении топ-10";
pub const RANDOM_NOT_FOUND: &str = "Не найдены фильмы";
pub const RANDOM_FAILED: &str = "Ошибка при выборе фильма";

pub async fn run(bot: Bot, tmdb: TmdbClient) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %e, "не удалось опубликовать список команд");
    }

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(on_command);

    tracing::info!("бот запущен");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![tmdb])
        .default_handler(|upd| async move {
            tracing::debug!(update_id = ?upd.id, "пропускаю не-команду");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("ошибка отправки ответа"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_command(bot: Bot, msg: Message, cmd: Command, tmdb: TmdbClient) -> ResponseResult<()> {
    tracing::info!(chat_id = msg.chat.id.0, command = ?cmd, "команда");
    let text = reply(&cmd, &tmdb).await;
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Текст единственного ответа на команду. Ошибки TMDB превращаются в текст,
/// наружу ничего не выходит.
pub async fn reply(cmd: &Command, tmdb: &TmdbClient) -> String {
    match cmd {
        Command::Start => START_TEXT.to_string(),
        Command::Help => HELP_TEXT.to_string(),
        Command::Search(args) => search_reply(args, tmdb).await,
        Command::Top => top_reply(tmdb).await,
        Command::Random => random_reply(tmdb).await,
    }
}

async fn search_reply(args: &str, tmdb: &TmdbClient) -> String {
    let query = args.split_whitespace().collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        return SEARCH_USAGE.to_string();
    }
    match tmdb.search(&query).await {
        Ok(m) => format::movie(&m),
        Err(LookupError::NotFound) => {
            tracing::info!(query = %query, "фильм не найден");
            SEARCH_NOT_FOUND.to_string()
        }
        Err(e) => failure_text(e, "поиск", SEARCH_FAILED),
    }
}

async fn top_reply(tmdb: &TmdbClient) -> String {
    match tmdb.popular_page(1).await {
        Ok(movies) => format::top_list(&movies).unwrap_or_else(|| TOP_EMPTY.to_string()),
        Err(e) => failure_text(e, "топ", TOP_FAILED),
    }
}

async fn random_reply(tmdb: &TmdbClient) -> String {
    match tmdb.random_popular().await {
        Ok(m) => format::random_movie(&m),
        Err(LookupError::NotFound) => {
            tracing::info!("страница популярного пуста");
            RANDOM_NOT_FOUND.to_string()
        }
        Err(e) => failure_text(e, "случайный фильм", RANDOM_FAILED),
    }
}

fn failure_text(e: LookupError, what: &str, generic: &str) -> String {
    match e {
        LookupError::Api(status) => {
            tracing::warn!(what, status = status.as_u16(), "TMDB вернул ошибку");
            format!("Ошибка API: {}", status.as_u16())
        }
        other => {
            tracing::error!(what, error = %other, "запрос к TMDB не удался");
            generic.to_string()
        }
    }
}
