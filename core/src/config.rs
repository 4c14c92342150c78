use std::env;

use crate::adapters::postgrest::DEFAULT_FACTS_TABLE;
use crate::domain::entities::CategoryRegistry;
use crate::domain::ports::DEFAULT_FETCH_LIMIT;
use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the hosted backend (the part before `/rest/v1`)
    pub backend_url: String,
    /// Anon key, sent both as `apikey` and as bearer token
    pub api_key: String,
    /// Table the facts live in
    pub table: String,
    /// Row cap for every feed fetch
    pub fetch_limit: usize,
    /// Categories facts can be tagged with
    pub categories: CategoryRegistry,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url =
            lookup("TIL_BACKEND_URL").ok_or(ConfigError::Missing("TIL_BACKEND_URL"))?;
        let api_key = lookup("TIL_API_KEY").ok_or(ConfigError::Missing("TIL_API_KEY"))?;

        let fetch_limit = match lookup("TIL_FETCH_LIMIT") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "TIL_FETCH_LIMIT",
                        message: format!("'{}' is not a positive integer", raw),
                    })
                }
            },
            None => DEFAULT_FETCH_LIMIT,
        };

        let categories = match lookup("TIL_CATEGORIES") {
            Some(raw) => CategoryRegistry::parse(&raw).map_err(|e| ConfigError::Invalid {
                key: "TIL_CATEGORIES",
                message: e.to_string(),
            })?,
            None => CategoryRegistry::default(),
        };

        Ok(Self {
            backend_url,
            api_key,
            table: lookup("TIL_TABLE").unwrap_or_else(|| DEFAULT_FACTS_TABLE.to_string()),
            fetch_limit,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[
            ("TIL_BACKEND_URL", "https://db.example.com"),
            ("TIL_API_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.table, "facts");
        assert_eq!(config.fetch_limit, 1000);
        assert_eq!(config.categories, CategoryRegistry::default());
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            ("TIL_BACKEND_URL", "https://db.example.com"),
            ("TIL_API_KEY", "anon"),
            ("TIL_TABLE", "til_facts"),
            ("TIL_FETCH_LIMIT", "50"),
            ("TIL_CATEGORIES", "geography=#22c55e,music=#a855f7"),
        ]))
        .unwrap();

        assert_eq!(config.table, "til_facts");
        assert_eq!(config.fetch_limit, 50);
        assert!(config.categories.is_assignable("geography"));
        assert!(!config.categories.is_assignable("science"));
    }

    #[test]
    fn missing_required_values() {
        let err = Config::from_lookup(lookup(&[("TIL_API_KEY", "anon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TIL_BACKEND_URL")));

        let err =
            Config::from_lookup(lookup(&[("TIL_BACKEND_URL", "https://db.example.com")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TIL_API_KEY")));
    }

    #[test]
    fn invalid_values() {
        for limit in ["0", "-3", "lots"] {
            let err = Config::from_lookup(lookup(&[
                ("TIL_BACKEND_URL", "https://db.example.com"),
                ("TIL_API_KEY", "anon"),
                ("TIL_FETCH_LIMIT", limit),
            ]))
            .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    key: "TIL_FETCH_LIMIT",
                    ..
                }
            ));
        }

        let err = Config::from_lookup(lookup(&[
            ("TIL_BACKEND_URL", "https://db.example.com"),
            ("TIL_API_KEY", "anon"),
            ("TIL_CATEGORIES", "geography"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "TIL_CATEGORIES",
                ..
            }
        ));
    }
}
