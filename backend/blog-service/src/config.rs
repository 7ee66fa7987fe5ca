/// Configuration management for the blog service
///
/// Handles loading and managing configuration from environment variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Post ranking configuration
    pub ranking: RankingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Weights of the composite "top posts" score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    pub rating_weight: f64,
    pub feedback_weight: f64,
    pub comment_weight: f64,
    pub view_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            rating_weight: 0.5,
            feedback_weight: 0.3,
            comment_weight: 0.1,
            view_weight: 0.1,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BLOG_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(4000),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:5173".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/devlog".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            ranking: RankingConfig {
                rating_weight: parse_env_or_default("RANKING_RATING_WEIGHT", 0.5)?,
                feedback_weight: parse_env_or_default("RANKING_FEEDBACK_WEIGHT", 0.3)?,
                comment_weight: parse_env_or_default("RANKING_COMMENT_WEIGHT", 0.1)?,
                view_weight: parse_env_or_default("RANKING_VIEW_WEIGHT", 0.1)?,
            },
        })
    }
}

fn parse_env_or_default(key: &str, default: f64) -> Result<f64, String> {
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "BLOG_SERVICE_HOST",
            "BLOG_SERVICE_PORT",
            "CORS_ALLOWED_ORIGINS",
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "RANKING_RATING_WEIGHT",
            "RANKING_FEEDBACK_WEIGHT",
            "RANKING_COMMENT_WEIGHT",
            "RANKING_VIEW_WEIGHT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 4000);
        assert_eq!(config.cors.allowed_origins, "http://localhost:5173");
        assert_eq!(config.ranking.rating_weight, 0.5);
        assert_eq!(config.ranking.feedback_weight, 0.3);
        assert_eq!(config.ranking.comment_weight, 0.1);
        assert_eq!(config.ranking.view_weight, 0.1);
    }

    #[test]
    #[serial_test::serial]
    fn test_production_requires_cors_origins() {
        clear_env();
        std::env::set_var("APP_ENV", "production");

        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://devlog.example.com");
        assert!(Config::from_env().is_ok());

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_ranking_weight_override() {
        clear_env();
        std::env::set_var("RANKING_VIEW_WEIGHT", "0.25");

        let config = Config::from_env().unwrap();
        assert_eq!(config.ranking.view_weight, 0.25);

        std::env::set_var("RANKING_VIEW_WEIGHT", "not-a-number");
        assert!(Config::from_env().is_err());

        clear_env();
    }
}
