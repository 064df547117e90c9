use crate::{
    auth::{
        hash_password, verify_password, LoginRequest, RegisterRequest, RegisterResponse,
        TokenResponse, TokenService,
    },
    db,
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;

const EMAIL_TAKEN: &str = "Email already registered";
const BAD_CREDENTIALS: &str = "Incorrect email or password";

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{"id": <user id>}`.
/// - `400 Bad Request`: the email is already registered.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    if db::users::email_exists(&pool, &register_data.email).await? {
        return Err(AppError::BadRequest(EMAIL_TAKEN.into()));
    }

    let password_hash = hash_password(&register_data.password)?;

    // A concurrent registration can still win the race; the unique index catches it.
    let id = db::users::create_user(&pool, &register_data.email, &password_hash)
        .await?
        .ok_or_else(|| AppError::BadRequest(EMAIL_TAKEN.into()))?;

    log::info!("registered user {}", id);
    Ok(HttpResponse::Created().json(RegisterResponse { id }))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"access_token": "...", "token_type": "bearer"}`.
/// - `400 Bad Request`: unknown email or wrong password (same message for both).
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = db::users::find_by_email(&pool, &login_data.email)
        .await?
        .ok_or_else(|| AppError::BadRequest(BAD_CREDENTIALS.into()))?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::BadRequest(BAD_CREDENTIALS.into()));
    }

    let token = tokens.issue(&user.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}
