use serde::Deserialize;
use std::{fmt, io, path::Path};
use thiserror::Error;

pub const DEFAULT_PATH: &str = "config.json";
/// Код выхода процесса, если в конфиге не хватает ключей.
pub const EXIT_MISSING_KEYS: i32 = 1;

/// Пример содержимого, печатается при незаполненном конфиге.
pub const TEMPLATE: &str = r#"{
    "TMDB_API": "ваш_ключ_tmdb",
    "BOT_TOKEN": "ваш_токен_бота"
}"#;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("в конфиге не найден ключ {0}")]
    Missing(&'static str),
}

/// Содержимое config.json как есть: любой ключ может отсутствовать.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RawConfig {
    #[serde(rename = "TMDB_API")]
    pub tmdb_api: Option<String>,
    #[serde(rename = "BOT_TOKEN")]
    pub bot_token: Option<String>,
    #[serde(rename = "TMDB_BASE_URL")]
    pub tmdb_base_url: Option<String>,
}

/// Проверенный конфиг. Создаётся один раз при старте и дальше только читается.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub bot_token: String,
    pub tmdb_base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"***")
            .field("bot_token", &"***")
            .field("tmdb_base_url", &self.tmdb_base_url)
            .finish()
    }
}

/// Читает JSON-конфиг. Ошибка чтения или разбора не пробрасывается:
/// она логируется, а наружу уходит пустой конфиг.
pub fn load_config(path: impl AsRef<Path>) -> RawConfig {
    let path = path.as_ref();
    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "не удалось прочитать конфиг");
            return RawConfig::default();
        }
    };
    match serde_json::from_slice::<RawConfig>(&data) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "не удалось разобрать конфиг");
            RawConfig::default()
        }
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Загрузка и проверка при старте. Если ключа не хватает, ошибка логируется,
/// в `out` печатается пример config.json, и процесс должен завершиться
/// с `EXIT_MISSING_KEYS`, не создавая бота.
pub fn load_or_explain(path: impl AsRef<Path>, out: &mut impl io::Write) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    Config::try_from(load_config(path)).inspect_err(|e| {
        tracing::error!(path = %path.display(), "{e}");
        writeln!(out, "Пример содержимого {}:\n{TEMPLATE}", path.display()).ok();
    })
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            api_key: required(raw.tmdb_api, "TMDB_API")?,
            bot_token: required(raw.bot_token, "BOT_TOKEN")?,
            tmdb_base_url: raw.tmdb_base_url.filter(|u| !u.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn both_keys_present() {
        let cfg = Config::try_from(raw(r#"{"TMDB_API":"k","BOT_TOKEN":"t"}"#)).unwrap();
        assert_eq!(cfg.api_key, "k");
        assert_eq!(cfg.bot_token, "t");
        assert!(cfg.tmdb_base_url.is_none());
    }

    #[test]
    fn missing_or_blank_keys_are_rejected() {
        assert_eq!(
            Config::try_from(raw(r#"{"BOT_TOKEN":"t"}"#)).unwrap_err(),
            ConfigError::Missing("TMDB_API")
        );
        assert_eq!(
            Config::try_from(raw(r#"{"TMDB_API":"k","BOT_TOKEN":"  "}"#)).unwrap_err(),
            ConfigError::Missing("BOT_TOKEN")
        );
        assert_eq!(
            Config::try_from(raw(r#"{"TMDB_API":null,"BOT_TOKEN":"t"}"#)).unwrap_err(),
            ConfigError::Missing("TMDB_API")
        );
        assert!(Config::try_from(RawConfig::default()).is_err());
    }

    #[test]
    fn unreadable_file_gives_empty_config() {
        let raw = load_config("/definitely/not/here/config.json");
        assert!(raw.tmdb_api.is_none() && raw.bot_token.is_none());
    }

    #[test]
    fn broken_json_gives_empty_config() {
        let path = std::env::temp_dir().join(format!("kino_bot_cfg_{}.json", std::process::id()));
        std::fs::write(&path, b"{ not json").unwrap();
        let raw = load_config(&path);
        std::fs::remove_file(&path).ok();
        assert!(raw.tmdb_api.is_none() && raw.bot_token.is_none());
    }

    #[test]
    fn template_is_valid_and_complete() {
        let cfg = Config::try_from(raw(TEMPLATE)).unwrap();
        assert_eq!(cfg.api_key, "ваш_ключ_tmdb");
    }

    #[test]
    fn incomplete_config_prints_template() {
        let path = std::env::temp_dir().join(format!("kino_bot_partial_{}.json", std::process::id()));
        std::fs::write(&path, br#"{"TMDB_API":"k"}"#).unwrap();
        let mut out = Vec::new();
        let res = load_or_explain(&path, &mut out);
        std::fs::remove_file(&path).ok();

        assert_eq!(res.unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains(TEMPLATE), "{printed}");
    }

    #[test]
    fn complete_config_prints_nothing() {
        let path = std::env::temp_dir().join(format!("kino_bot_full_{}.json", std::process::id()));
        std::fs::write(&path, br#"{"TMDB_API":"k","BOT_TOKEN":"t"}"#).unwrap();
        let mut out = Vec::new();
        let res = load_or_explain(&path, &mut out);
        std::fs::remove_file(&path).ok();

        assert_eq!(res.unwrap().bot_token, "t");
        assert!(out.is_empty());
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = Config::try_from(raw(r#"{"TMDB_API":"secret-key","BOT_TOKEN":"123:abc"}"#)).unwrap();
        let out = format!("{cfg:?}");
        assert!(!out.contains("secret-key"));
        assert!(!out.contains("123:abc"));
    }
}
