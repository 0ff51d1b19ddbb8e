use actix_web::{dev::Service, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feedgen_service::algos::{AlgoContext, AlgoRegistry};
use feedgen_service::db::PgInteractionStore;
use feedgen_service::handlers::{describe_feed_generator, did_document, get_feed_skeleton};
use feedgen_service::handlers::feed::FeedHandlerState;
use feedgen_service::services::AppViewClient;
use feedgen_service::{metrics, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Structured JSON logging with env-filter control
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_line_number(true)
                .with_file(true),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting feedgen-service v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.env);
    info!("Publisher DID: {}", config.identity.publisher_did);

    // Initialize database (standardized pool)
    let db_cfg = db_pool::DbConfig {
        service_name: "feedgen-service".to_string(),
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..db_pool::DbConfig::default()
    };
    db_cfg.log_config();
    let pool = match db_pool::create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("Database migration failed: {}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    // One session for the lifetime of the process, shared by all requests
    let appview = match AppViewClient::connect(&config.appview).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("AppView client initialization failed: {}", e);
            eprintln!("ERROR: Failed to initialize AppView client: {}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(FeedHandlerState {
        config: config.clone(),
        registry: AlgoRegistry::with_defaults(),
        ctx: AlgoContext {
            store: Arc::new(PgInteractionStore::new(pool.clone())),
            source: Arc::new(appview),
            settings: config.feed.clone(),
        },
    });
    info!("Feed algorithms registered: {:?}", state.registry.shortnames());

    let port = config.app.port;
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = req
                    .match_pattern()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| req.path().to_string());
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            metrics::observe_http_request(&method, &path, 500, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .service(get_feed_skeleton)
            .service(describe_feed_generator)
            .service(did_document)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
