use axum::{extract::DefaultBodyLimit, middleware::from_fn_with_state, Router};
use cityzen_core::core::config::Config;
use cityzen_core::core::openapi::{ApiDoc, SwaggerInfoModifier};
use cityzen_core::core::{database, middleware};
use cityzen_core::features::ai::{routes as ai_routes, AiService, HttpAiGateway};
use cityzen_core::features::categories::repositories::PgCategoryRepository;
use cityzen_core::features::categories::{routes as categories_routes, CategoryService};
use cityzen_core::features::complaints::clients::HttpAuthorityRecommender;
use cityzen_core::features::complaints::repositories::PgComplaintRepository;
use cityzen_core::features::complaints::{
    routes as complaints_routes, ComplaintService, RecommendationService,
};
use cityzen_core::features::health::{routes as health_routes, HealthService};
use cityzen_core::features::users::repositories::PgUserRepository;
use cityzen_core::features::users::{routes as users_routes, UserService};
use cityzen_core::modules::storage;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded successfully (environment: {})",
        config.app.environment
    );

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let object_storage = storage::connect(&config.storage)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;
    tracing::info!(
        "Object storage initialized ({:?}, bucket: {})",
        config.storage.backend,
        config.storage.bucket
    );

    // Repositories
    let category_repository = Arc::new(PgCategoryRepository::new(pool.clone()));
    let complaint_repository = Arc::new(PgComplaintRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));

    // Outbound integrations
    let upstream_timeout = config.integrations.upstream_timeout;
    let recommender = Arc::new(
        HttpAuthorityRecommender::new(
            &config.integrations.recommendation_service_url,
            upstream_timeout,
        )
        .map_err(|e| anyhow::anyhow!("Failed to create recommendation client: {}", e))?,
    );
    let ai_gateway = Arc::new(
        HttpAiGateway::new(
            &config.integrations.ai_service_url,
            &config.integrations.text_service_url,
            upstream_timeout,
        )
        .map_err(|e| anyhow::anyhow!("Failed to create AI client: {}", e))?,
    );
    tracing::info!(
        "Integrations configured (ai: {}, recommendations: {}, text: {})",
        config.integrations.ai_service_url,
        config.integrations.recommendation_service_url,
        config.integrations.text_service_url
    );

    // Services
    let category_service = Arc::new(CategoryService::new(category_repository.clone()));
    let complaint_service = Arc::new(ComplaintService::new(
        complaint_repository,
        category_repository.clone(),
        object_storage,
        config.storage.prefix.clone(),
    ));
    let recommendation_service = Arc::new(RecommendationService::new(
        category_repository,
        recommender,
    ));
    let ai_service = Arc::new(AiService::new(ai_gateway));
    if config.admin.admin_code_secret.is_none() {
        tracing::warn!("ADMIN_CODE_SECRET not set; admin registration is disabled");
    }
    let user_service = Arc::new(UserService::new(
        user_repository,
        config.admin.admin_code_secret.clone(),
    ));
    let health_service = Arc::new(HealthService::new(
        config.app.environment.clone(),
        Arc::new(pool.clone()),
    ));
    tracing::info!("Services initialized");

    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::basic_auth,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let api_routes = Router::new()
        .merge(health_routes(health_service))
        .merge(users_routes(user_service))
        .merge(categories_routes(category_service))
        .merge(complaints_routes(complaint_service, recommendation_service))
        .merge(ai_routes(ai_service));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
