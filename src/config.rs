use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagouAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub pagouai: PagouAiConfig,
    /// Shared secret expected in `X-Webhook-Token` on gateway callbacks.
    pub webhook_token: Option<String>,
    /// Directory uploaded images are written to.
    pub upload_dir: String,
    /// URL prefix the upload directory is served under.
    pub asset_base_path: String,
    /// Raw card capture for presential processing; off unless explicitly enabled.
    pub allow_card_capture: bool,
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "acai-prime".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "acai-prime-admin".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let pagouai = PagouAiConfig {
            api_key: std::env::var("PAGOUAI_API_KEY").ok().filter(|v| !v.is_empty()),
            base_url: std::env::var("PAGOUAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.pagou.ai/v1".into()),
            timeout_secs: std::env::var("PAGOUAI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            database_url,
            jwt,
            pagouai,
            webhook_token: std::env::var("PIX_WEBHOOK_TOKEN").ok().filter(|v| !v.is_empty()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "attached_assets".into()),
            asset_base_path: std::env::var("ASSET_BASE_PATH")
                .unwrap_or_else(|_| "/attached_assets".into()),
            allow_card_capture: std::env::var("ALLOW_CARD_CAPTURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            production: std::env::var("APP_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),
        })
    }
}
