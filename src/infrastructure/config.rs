use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Root directory of the blob storage buckets
    pub storage_root: PathBuf,
    /// Base URL that uploaded blobs are served from
    pub public_storage_url: String,
    /// Directory listed by `GET /api/list-pdfs`
    pub pdf_dir: PathBuf,
    /// Directory backing local device storage
    pub local_storage_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://bookshare.db?mode=rwc".to_string(),
            port: 8000,
            cors_allowed_origins: Vec::new(),
            profile: "default".to_string(),
            storage_root: PathBuf::from("storage"),
            public_storage_url: "http://localhost:8000/storage".to_string(),
            pdf_dir: PathBuf::from("public/pdfs"),
            local_storage_dir: PathBuf::from("local"),
        }
    }
}

impl Config {
    /// Read settings from the environment. A `--profile` passed on the CLI
    /// takes precedence over `PROFILE`.
    pub fn from_env_with_profile(profile_override: Option<String>) -> Self {
        let defaults = Self::default();
        let profile = profile_override
            .or_else(|| env::var("PROFILE").ok())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                defaults.database_url.clone()
            } else {
                format!("sqlite://bookshare_{}.db?mode=rwc", profile)
            }
        });

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            database_url,
            port,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_root),
            public_storage_url: env::var("PUBLIC_STORAGE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/storage", port)),
            pdf_dir: env::var("PDF_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.pdf_dir),
            local_storage_dir: env::var("LOCAL_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.local_storage_dir),
            profile,
        }
    }
}
