use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub integrations: IntegrationsConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Deployment name reported by the health endpoint
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Which object store receives complaint images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Supabase Storage REST API
    Supabase,
    /// MinIO or any S3-compatible service
    S3,
}

/// Object storage configuration for complaint images
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket holding complaint media
    pub bucket: String,
    /// Key prefix for complaint images (e.g., "complaint_images")
    pub prefix: String,
    pub supabase: Option<SupabaseConfig>,
    pub s3: S3Config,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
}

#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    /// Public endpoint used when building image URLs (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Base URLs of the external AI services
#[derive(Debug, Clone)]
pub struct IntegrationsConfig {
    pub ai_service_url: String,
    pub recommendation_service_url: String,
    pub text_service_url: String,
    pub upstream_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Shared secret required for admin self-registration; unset disables it
    pub admin_code_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            integrations: IntegrationsConfig::from_env()?,
            admin: AdminConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 50 * 1024 * 1024; // 50MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            environment,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "CityZen API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for CityZen".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl StorageBackend {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "supabase" => Ok(Self::Supabase),
            "s3" | "minio" => Ok(Self::S3),
            other => Err(format!(
                "STORAGE_BACKEND must be 'supabase' or 's3', got '{}'",
                other
            )),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = StorageBackend::parse(
            &env::var("STORAGE_BACKEND").unwrap_or_else(|_| "supabase".to_string()),
        )?;

        let bucket = env::var("STORAGE_BUCKET").unwrap_or_else(|_| "cityzen-media".to_string());
        let prefix =
            env::var("STORAGE_PREFIX").unwrap_or_else(|_| "complaint_images".to_string());

        let supabase = match (env::var("SUPABASE_URL"), env::var("SUPABASE_SERVICE_KEY")) {
            (Ok(url), Ok(service_key)) if !url.is_empty() && !service_key.is_empty() => {
                Some(SupabaseConfig {
                    url: url.trim_end_matches('/').to_string(),
                    service_key,
                })
            }
            _ => None,
        };

        if backend == StorageBackend::Supabase && supabase.is_none() {
            return Err(
                "SUPABASE_URL and SUPABASE_SERVICE_KEY must be set for the supabase storage backend"
                    .to_string(),
            );
        }

        Ok(Self {
            backend,
            bucket,
            prefix,
            supabase,
            s3: S3Config::from_env(),
        })
    }
}

impl S3Config {
    pub fn from_env() -> Self {
        let endpoint =
            env::var("S3_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint = env::var("S3_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        Self {
            endpoint,
            public_endpoint,
            access_key: env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("S3_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl IntegrationsConfig {
    const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let ai_service_url =
            env::var("AI_SERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let recommendation_service_url = env::var("RECOMMENDATION_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8001".to_string());
        let text_service_url =
            env::var("TEXT_SERVICE_URL").unwrap_or_else(|_| "http://127.0.0.1:8001".to_string());

        let timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "UPSTREAM_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            ai_service_url: ai_service_url.trim_end_matches('/').to_string(),
            recommendation_service_url: recommendation_service_url
                .trim_end_matches('/')
                .to_string(),
            text_service_url: text_service_url.trim_end_matches('/').to_string(),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, String> {
        let admin_code_secret = env::var("ADMIN_CODE_SECRET").ok().filter(|s| !s.is_empty());
        Ok(Self { admin_code_secret })
    }
}
