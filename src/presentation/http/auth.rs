use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post, put},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::auth::forgot_password::{
    ForgotPassword as ForgotPasswordUc, ForgotPasswordOutcome,
};
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::application::use_cases::auth::reset_password::ResetPassword as ResetPasswordUc;
use crate::application::use_cases::auth::update_details::UpdateDetails as UpdateDetailsUc;
use crate::application::use_cases::auth::update_password::{
    PasswordUpdate, UpdatePassword as UpdatePasswordUc,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::{Role, user as user_rules};
use crate::presentation::http::error::{ApiError, map_db_err};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `user` (default) or `publisher`.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDetailsRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(value_type = String)]
    pub role: Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub success: bool,
    pub data: UserResponse,
}

impl From<crate::application::ports::user_repository::UserRow> for UserResponse {
    fn from(row: crate::application::ports::user_repository::UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/updatedetails", put(update_details))
        .route("/updatepassword", put(update_password))
        .route("/forgetpassword", post(forget_password))
        .route("/resetpassword/:token", put(reset_password))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "Auth", request_body = RegisterRequest, security(()), responses(
    (status = 200, body = TokenResponse),
    (status = 400, description = "Validation failure or duplicate email")
))]
pub async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Please add a name"));
    }
    user_rules::validate_email(&req.email).map_err(ApiError::bad_request)?;
    user_rules::validate_password(&req.password).map_err(ApiError::bad_request)?;
    let role = match req.role.as_deref() {
        None => Role::User,
        Some(r) => Role::parse_registerable(r)
            .ok_or_else(|| ApiError::bad_request("Please add a valid role"))?,
    };

    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(&RegisterDto {
            name: req.name,
            email: req.email,
            password: req.password,
            role,
        })
        .await
        .map_err(map_db_err)?;
    token_response(&ctx.cfg, user.id, user.role)
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = TokenResponse),
    (status = 401, description = "Invalid credentials")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let (email, password) = match (req.email, req.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return Err(ApiError::bad_request(
                "Please provide an email and password",
            ));
        }
    };
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(&LoginDto { email, password })
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;
    token_response(&ctx.cfg, user.id, user.role)
}

#[utoipa::path(get, path = "/api/v1/auth/logout", tag = "Auth", responses((status = 200)))]
pub async fn logout(State(ctx): State<AppContext>) -> (HeaderMap, Json<serde_json::Value>) {
    // Overwrite the cookie with a short-lived tombstone
    let mut headers = HeaderMap::new();
    let cookie = build_expired_cookie(ctx.cfg.is_production);
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(&cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );
    (headers, Json(serde_json::json!({ "success": true, "data": {} })))
}

#[utoipa::path(get, path = "/api/v1/auth/me", tag = "Auth", responses((status = 200, body = UserEnvelope)))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<UserEnvelope>, ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    let id = claims.user_id()?;
    let repo = ctx.user_repo();
    let uc = GetMe {
        repo: repo.as_ref(),
    };
    let row = uc
        .execute(id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;
    Ok(Json(UserEnvelope {
        success: true,
        data: row.into(),
    }))
}

#[utoipa::path(put, path = "/api/v1/auth/updatedetails", tag = "Auth", request_body = UpdateDetailsRequest, responses((status = 200, body = UserEnvelope)))]
pub async fn update_details(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<UpdateDetailsRequest>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    let id = claims.user_id()?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Please add a name"));
    }
    user_rules::validate_email(&req.email).map_err(ApiError::bad_request)?;

    let repo = ctx.user_repo();
    let uc = UpdateDetailsUc {
        repo: repo.as_ref(),
    };
    let row = uc
        .execute(id, &req.name, &req.email)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(UserEnvelope {
        success: true,
        data: row.into(),
    }))
}

#[utoipa::path(put, path = "/api/v1/auth/updatepassword", tag = "Auth", request_body = UpdatePasswordRequest, responses(
    (status = 200, body = TokenResponse),
    (status = 401, description = "Current password is wrong")
))]
pub async fn update_password(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let claims = validate_bearer(&ctx.cfg, bearer)?;
    let id = claims.user_id()?;
    user_rules::validate_password(&req.new_password).map_err(ApiError::bad_request)?;

    let repo = ctx.user_repo();
    let uc = UpdatePasswordUc {
        repo: repo.as_ref(),
    };
    let outcome = uc
        .execute(id, &req.current_password, &req.new_password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;
    match outcome {
        PasswordUpdate::IncorrectPassword => {
            Err(ApiError::unauthorized("Password is incorrect"))
        }
        PasswordUpdate::Updated(user) => token_response(&ctx.cfg, user.id, user.role),
    }
}

#[utoipa::path(post, path = "/api/v1/auth/forgetpassword", tag = "Auth", request_body = ForgotPasswordRequest, security(()), responses(
    (status = 200, description = "Reset email sent"),
    (status = 404, description = "No user with that email")
))]
pub async fn forget_password(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = req
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide an email"))?;

    let reset_url_base = {
        let host = headers
            .get(axum::http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        let proto = if ctx.cfg.is_production { "https" } else { "http" };
        format!("{proto}://{host}/api/v1/auth/resetpassword")
    };

    let repo = ctx.user_repo();
    let mailer = ctx.mailer();
    let uc = ForgotPasswordUc {
        repo: repo.as_ref(),
        mailer: mailer.as_ref(),
        reset_token_ttl_secs: ctx.cfg.reset_token_expire_secs,
    };
    match uc.execute(&email, &reset_url_base).await? {
        ForgotPasswordOutcome::EmailSent => {
            Ok(Json(serde_json::json!({ "success": true, "data": "Email sent" })))
        }
        ForgotPasswordOutcome::UnknownEmail => {
            Err(ApiError::not_found("There is no user with that email"))
        }
        ForgotPasswordOutcome::SendFailed => Err(ApiError::server("Email could not be sent")),
    }
}

#[utoipa::path(put, path = "/api/v1/auth/resetpassword/{token}", tag = "Auth", request_body = ResetPasswordRequest, security(()), params(
    ("token" = String, Path, description = "Plaintext reset token from the email")
), responses(
    (status = 200, body = TokenResponse),
    (status = 400, description = "Invalid or expired token")
))]
pub async fn reset_password(
    State(ctx): State<AppContext>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    user_rules::validate_password(&req.password).map_err(ApiError::bad_request)?;
    let repo = ctx.user_repo();
    let uc = ResetPasswordUc {
        repo: repo.as_ref(),
    };
    let user = uc
        .execute(&token, &req.password)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid token"))?;
    token_response(&ctx.cfg, user.id, user.role)
}

// --- Token response, Bearer extractor & JWT utils ---

/// Signs a JWT and sets it both in the body and as the `token` cookie,
/// mirroring the registration/login/reset flows.
fn token_response(
    cfg: &Config,
    user_id: Uuid,
    role: Role,
) -> Result<(HeaderMap, Json<TokenResponse>), ApiError> {
    let token = sign_token(cfg, user_id, role)?;
    let mut headers = HeaderMap::new();
    let cookie = build_token_cookie(&token, cfg.jwt_cookie_expire_days, cfg.is_production);
    headers.insert(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(&cookie)
            .unwrap_or(axum::http::HeaderValue::from_static("")),
    );
    Ok((
        headers,
        Json(TokenResponse {
            success: true,
            token,
        }),
    ))
}

pub fn sign_token(cfg: &Config, user_id: Uuid, role: Role) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.as_str().to_string(),
        exp: now + (cfg.jwt_expires_secs as usize),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )
    .map_err(|_| ApiError::server("Server Error"))
}

pub struct Bearer(pub String);

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // 1) Prefer Authorization header if present
        if let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.to_string()));
            }
        }

        // 2) Fallback to the HttpOnly `token` cookie
        if let Some(cookie_hdr) = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, "token") {
                return Ok(Bearer(token));
            }
        }

        Err(ApiError::unauthorized("Not authorized to access this route"))
    }
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| ApiError::unauthorized("Not authorized to access this route"))
    }

    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }
}

pub fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<Claims, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        &bearer.0,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::unauthorized("Not authorized to access this route"))?;
    Ok(data.claims)
}

/// 403 unless the caller holds one of `allowed`.
pub fn require_roles(claims: &Claims, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&claims.role()) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "User role {} is not authorized to access this route",
            claims.role
        )))
    }
}

// --- Cookie helpers ---

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

fn build_token_cookie(token: &str, expire_days: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "token={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        (expire_days.max(0)) * 24 * 60 * 60
    )
}

fn build_expired_cookie(secure: bool) -> String {
    // 10 second grace, as a visible tombstone rather than a straight delete
    let secure_attr = if secure { "; Secure" } else { "" };
    format!("token=none; HttpOnly{secure_attr}; Path=/; Max-Age=10; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn test_cfg() -> Config {
        Config {
            port: 5000,
            database_url: String::new(),
            jwt_secret: "unit-test-secret".into(),
            jwt_expires_secs: 3600,
            jwt_cookie_expire_days: 30,
            reset_token_expire_secs: 600,
            file_upload_path: String::new(),
            max_file_upload: 1024,
            geocoder_url: String::new(),
            geocoder_api_key: None,
            mail_api_url: None,
            mail_api_key: None,
            from_email: String::new(),
            from_name: String::new(),
            frontend_url: None,
            is_production: false,
        }
    }

    #[test]
    fn signed_tokens_validate_and_carry_role() {
        let cfg = test_cfg();
        let id = Uuid::new_v4();
        let token = sign_token(&cfg, id, Role::Publisher).unwrap();
        let claims = validate_bearer(&cfg, Bearer(token)).unwrap();
        assert_eq!(claims.user_id().unwrap(), id);
        assert_eq!(claims.role(), Role::Publisher);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let cfg = test_cfg();
        let token = sign_token(&cfg, Uuid::new_v4(), Role::User).unwrap();
        let mut other = test_cfg();
        other.jwt_secret = "a-different-secret!".into();
        assert!(validate_bearer(&other, Bearer(token)).is_err());
    }

    #[test]
    fn role_gate_rejects_plain_users() {
        let cfg = test_cfg();
        let token = sign_token(&cfg, Uuid::new_v4(), Role::User).unwrap();
        let claims = validate_bearer(&cfg, Bearer(token)).unwrap();
        let err = require_roles(&claims, &[Role::Publisher, Role::Admin]).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(
            err.message,
            "User role user is not authorized to access this route"
        );
        assert!(require_roles(&claims, &[Role::User]).is_ok());
    }

    #[test]
    fn token_cookie_attributes() {
        let c = build_token_cookie("abc", 30, false);
        assert_eq!(c, "token=abc; HttpOnly; Path=/; Max-Age=2592000; SameSite=Lax");
        let secure = build_token_cookie("abc", 1, true);
        assert!(secure.contains("; Secure"));
        assert!(secure.contains("Max-Age=86400"));
    }

    #[test]
    fn cookie_parsing_finds_the_token() {
        let hdr = "theme=dark; token=abc.def.ghi; other=1";
        assert_eq!(get_cookie(hdr, "token").as_deref(), Some("abc.def.ghi"));
        assert_eq!(get_cookie("theme=dark", "token"), None);
    }
}
