pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StorageBackend};
use crate::services::{
    AccountService, GeminiSentenceGenerator, GoogleTranslator, QuizService, SentenceGenerator,
    Translator, VocabularyService,
};
use crate::storage::{JsonStorage, SqliteStorage, Storage, StorageError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub vocabulary: Arc<VocabularyService>,
    pub quiz: Arc<QuizService>,
    pub translator: Arc<dyn Translator>,
    pub sentences: Arc<dyn SentenceGenerator>,
}

impl AppState {
    /// Wire the services around one storage backend.
    pub fn new(
        storage: Arc<dyn Storage>,
        translator: Arc<dyn Translator>,
        sentences: Arc<dyn SentenceGenerator>,
        seconds_per_question: u32,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            accounts: Arc::new(AccountService::new(storage.clone())),
            vocabulary: Arc::new(VocabularyService::load(storage.clone())?),
            quiz: Arc::new(QuizService::new(storage, seconds_per_question)),
            translator,
            sentences,
        })
    }
}

/// Open the configured storage backend.
pub fn open_storage(config: &Config) -> Result<Arc<dyn Storage>, StorageError> {
    let storage: Arc<dyn Storage> = match config.storage {
        StorageBackend::Json => Arc::new(JsonStorage::open(&config.data_dir)?),
        StorageBackend::Sqlite => Arc::new(SqliteStorage::open(&config.sqlite_path)?),
    };
    Ok(storage)
}

/// Build the full router with public and protected routes.
pub fn build_router(state: AppState) -> Router {
    let flashcards = "/api/languages/:language/subcategories/:subcategory/flashcards";

    let protected_routes = Router::new()
        // Account routes
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/me", get(routes::auth::me))
        // Vocabulary routes
        .route(
            "/api/languages",
            get(routes::languages::list).post(routes::languages::create),
        )
        .route(
            "/api/languages/:language",
            axum::routing::delete(routes::languages::delete),
        )
        .route(
            "/api/languages/:language/subcategories",
            post(routes::languages::create_subcategory),
        )
        .route(
            "/api/languages/:language/subcategories/:subcategory",
            axum::routing::delete(routes::languages::delete_subcategory),
        )
        .route(
            flashcards,
            get(routes::flashcards::list).post(routes::flashcards::create),
        )
        .route(
            &format!("{flashcards}/:word"),
            put(routes::flashcards::update).delete(routes::flashcards::delete),
        )
        // Quiz routes
        .route(
            "/api/quiz",
            get(routes::quiz::current).post(routes::quiz::start),
        )
        .route("/api/quiz/answer", post(routes::quiz::answer))
        .route("/api/quiz/choice", post(routes::quiz::choose))
        // Results routes
        .route("/api/results", get(routes::results::list))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Tick every running quiz once per second.
pub fn spawn_quiz_timer(quiz: Arc<QuizService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            quiz.tick_all().await;
        }
    })
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(backend = ?config.storage, "Opening storage...");
    let storage = open_storage(&config)?;

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;
    let translator: Arc<dyn Translator> =
        Arc::new(GoogleTranslator::from_config(client.clone(), &config));
    let generator = GeminiSentenceGenerator::from_config(client, &config);
    if !generator.is_available() {
        tracing::warn!("GEMINI_API_KEY not set, only built-in example sentences are available");
    }

    let state = AppState::new(
        storage,
        translator,
        Arc::new(generator),
        config.seconds_per_question,
    )?;

    let _timer = spawn_quiz_timer(state.quiz.clone());
    let app = build_router(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
