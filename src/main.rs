use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::Utc;
use debate_feed_service::cache::RedisFeedCache;
use debate_feed_service::db::{ensure_schema, PgCandidateStore};
use debate_feed_service::handlers::{self, FeedHandlerState};
use debate_feed_service::middleware::CallerIdentityMiddleware;
use debate_feed_service::services::{FeedService, FeedServiceConfig};
use debate_feed_service::Config;
use redis::aio::ConnectionManager;
use redis::RedisError;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: sqlx::Pool<sqlx::Postgres>,
    redis_manager: ConnectionManager,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), RedisError> {
        let mut conn = self.redis_manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "debate-feed-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "debate-feed-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();
    let mut ready = true;

    let start = Instant::now();
    let pg_result = state.check_postgres().await;
    let pg_latency = Some(start.elapsed().as_millis() as u64);
    let postgres_check = match pg_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms: pg_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("PostgreSQL connection failed: {}", e),
                latency_ms: pg_latency,
            }
        }
    };
    checks.insert("postgresql".to_string(), postgres_check);

    let start = Instant::now();
    let redis_result = state.check_redis().await;
    let redis_latency = Some(start.elapsed().as_millis() as u64);
    let redis_check = match redis_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "Redis ping successful".to_string(),
            latency_ms: redis_latency,
        },
        Err(e) => {
            // The feed degrades to uncached computation without Redis, but a
            // broken cache still fails readiness so orchestration notices.
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("Redis ping failed: {}", e),
                latency_ms: redis_latency,
            }
        }
    };
    checks.insert("redis".to_string(), redis_check);

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Starting debate-feed-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to PostgreSQL");

    ensure_schema(&db_pool).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to ensure database schema: {e}"),
        )
    })?;

    // Initialize Redis for feed envelope caching
    let redis_client = redis::Client::open(config.cache.url.as_str()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Invalid Redis URL {}: {e}", config.cache.url),
        )
    })?;
    let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize Redis connection: {e}"),
        )
    })?;
    tracing::info!("Connected to Redis");

    let candidate_store = Arc::new(PgCandidateStore::new(db_pool.clone()));
    let feed_cache = Arc::new(RedisFeedCache::new(redis_manager.clone()));

    let feed_service = Arc::new(FeedService::new(
        candidate_store,
        feed_cache,
        FeedServiceConfig {
            cache_ttl_secs: config.feed.cache_ttl_secs,
        },
    ));

    let feed_state = web::Data::new(FeedHandlerState {
        feed: feed_service,
        default_limit: config.feed.default_limit,
        max_limit: config.feed.max_limit,
    });
    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
        redis_manager,
    });

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::QueryConfig::default().error_handler(handlers::query_error_handler))
            .app_data(feed_state.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(debate_feed_service::metrics::serve_metrics),
            )
            .route("/health", web::get().to(health_summary))
            .route("/health/ready", web::get().to(readiness_summary))
            .route("/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/debate-room")
                    .wrap(CallerIdentityMiddleware)
                    .route("/feed", web::get().to(handlers::get_feed)),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
