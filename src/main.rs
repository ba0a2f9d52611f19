use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, MatchedPath};
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use devcamp_api::application::ports::geocoder::Geocoder;
use devcamp_api::application::ports::mailer::Mailer;
use devcamp_api::bootstrap::app_context::{AppContext, AppServices};
use devcamp_api::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            devcamp_api::presentation::http::auth::register,
            devcamp_api::presentation::http::auth::login,
            devcamp_api::presentation::http::auth::logout,
            devcamp_api::presentation::http::auth::me,
            devcamp_api::presentation::http::auth::update_details,
            devcamp_api::presentation::http::auth::update_password,
            devcamp_api::presentation::http::auth::forget_password,
            devcamp_api::presentation::http::auth::reset_password,
            devcamp_api::presentation::http::bootcamps::list_bootcamps,
            devcamp_api::presentation::http::bootcamps::get_bootcamp,
            devcamp_api::presentation::http::bootcamps::create_bootcamp,
            devcamp_api::presentation::http::bootcamps::update_bootcamp,
            devcamp_api::presentation::http::bootcamps::delete_bootcamp,
            devcamp_api::presentation::http::bootcamps::bootcamps_in_radius,
            devcamp_api::presentation::http::bootcamps::upload_photo,
            devcamp_api::presentation::http::health::health,
        ),
        components(schemas(
            devcamp_api::presentation::http::auth::RegisterRequest,
            devcamp_api::presentation::http::auth::LoginRequest,
            devcamp_api::presentation::http::auth::UpdateDetailsRequest,
            devcamp_api::presentation::http::auth::UpdatePasswordRequest,
            devcamp_api::presentation::http::auth::ForgotPasswordRequest,
            devcamp_api::presentation::http::auth::ResetPasswordRequest,
            devcamp_api::presentation::http::auth::TokenResponse,
            devcamp_api::presentation::http::auth::UserResponse,
            devcamp_api::presentation::http::auth::UserEnvelope,
            devcamp_api::presentation::http::bootcamps::BootcampResponse,
            devcamp_api::presentation::http::bootcamps::BootcampEnvelope,
            devcamp_api::presentation::http::bootcamps::BootcampListResponse,
            devcamp_api::presentation::http::bootcamps::Pagination,
            devcamp_api::presentation::http::bootcamps::PageRef,
            devcamp_api::presentation::http::bootcamps::RadiusResponse,
            devcamp_api::presentation::http::bootcamps::CreateBootcampRequest,
            devcamp_api::presentation::http::bootcamps::UpdateBootcampRequest,
            devcamp_api::presentation::http::bootcamps::UploadPhotoMultipart,
            devcamp_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication and account management"),
            (name = "Bootcamps", description = "Bootcamp directory"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "devcamp_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(port = cfg.port, "Starting DevCamp backend");

    // Database
    let pool = devcamp_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    devcamp_api::infrastructure::db::migrate(&pool).await?;

    let user_repo = Arc::new(
        devcamp_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
            pool.clone(),
        ),
    );
    let bootcamp_repo = Arc::new(
        devcamp_api::infrastructure::db::repositories::bootcamp_repository_sqlx::SqlxBootcampRepository::new(
            pool.clone(),
        ),
    );
    let mailer: Arc<dyn Mailer> = match &cfg.mail_api_url {
        Some(url) => Arc::new(devcamp_api::infrastructure::email::HttpMailer::new(
            url,
            cfg.mail_api_key.clone(),
            &cfg.from_name,
            &cfg.from_email,
        )),
        None => {
            tracing::warn!("MAIL_API_URL not set, reset emails will only be logged");
            Arc::new(devcamp_api::infrastructure::email::DevMailer)
        }
    };
    let geocoder: Arc<dyn Geocoder> = Arc::new(
        devcamp_api::infrastructure::geo::ReqwestGeocoder::new(
            &cfg.geocoder_url,
            cfg.geocoder_api_key.clone(),
        ),
    );
    let photo_store = Arc::new(devcamp_api::infrastructure::storage::FsPhotoStore::new(
        cfg.file_upload_path.clone(),
    ));

    let services = AppServices::new(user_repo, bootcamp_repo, mailer, geocoder, photo_store);
    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = if let Some(origin) = cfg.frontend_url.clone() {
        let origin = HeaderValue::from_str(&origin)
            .map(AllowOrigin::exact)
            .unwrap_or_else(|_| AllowOrigin::mirror_request());
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true)
    };

    // Ensure uploads dir exists
    if let Err(e) = tokio::fs::create_dir_all(&cfg.file_upload_path).await {
        tracing::warn!(error = ?e, dir = %cfg.file_upload_path, "Failed to create uploads dir");
    }

    let app = Router::new()
        .nest(
            "/api/v1",
            devcamp_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/v1/auth",
            devcamp_api::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api/v1/bootcamp",
            devcamp_api::presentation::http::bootcamps::routes(ctx.clone()),
        )
        .nest_service("/uploads", ServeDir::new(&cfg.file_upload_path))
        .merge(SwaggerUi::new("/api/v1/docs").url("/api/v1/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(DefaultBodyLimit::max(cfg.max_file_upload * 2))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    info!(%addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
