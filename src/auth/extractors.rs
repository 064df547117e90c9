use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::token::TokenService;
use crate::db;
use crate::error::AppError;
use crate::models::CurrentUser;

/// Returns the credential of an `Authorization: Bearer <token>` header, if present.
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Resolves the authenticated user for routes that declare a `CurrentUser` argument.
///
/// The token is validated with the shared `TokenService`, then its subject is looked up
/// in the `users` table. A missing header, a rejected token and an unknown subject all
/// produce the same 401 response.
impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let tokens = req.app_data::<web::Data<TokenService>>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();
        let token = bearer_token(req).map(str::to_owned);

        Box::pin(async move {
            let tokens = tokens.ok_or_else(|| {
                AppError::InternalServerError("TokenService is not registered".into())
            })?;
            let token = token.ok_or_else(AppError::unauthenticated)?;
            let claims = tokens.validate(&token)?;

            let pool = pool
                .ok_or_else(|| AppError::InternalServerError("PgPool is not registered".into()))?;
            let user = db::users::find_by_email(&pool, &claims.sub)
                .await
                .map_err(AppError::from)?;

            match user {
                Some(user) => Ok(CurrentUser::from(user)),
                None => {
                    log::debug!("token subject no longer exists");
                    Err(AppError::unauthenticated().into())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use chrono::Duration;

    fn tokens() -> web::Data<TokenService> {
        web::Data::new(TokenService::new("extractor_secret", Duration::minutes(30)))
    }

    async fn extract(req: HttpRequest) -> Result<CurrentUser, ActixError> {
        let mut payload = Payload::None;
        CurrentUser::from_request(&req, &mut payload).await
    }

    fn assert_unauthorized(err: ActixError) {
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        for value in ["bearer abc.def.ghi", "BEARER abc.def.ghi", "Bearer  abc.def.ghi "] {
            let req = TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();
            assert_eq!(bearer_token(&req), Some("abc.def.ghi"), "header {:?}", value);
        }

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearerabc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[actix_rt::test]
    async fn test_missing_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(tokens())
            .to_http_request();

        assert_unauthorized(extract(req).await.unwrap_err());
    }

    #[actix_rt::test]
    async fn test_expired_token_is_unauthorized() {
        let tokens = tokens();
        let expired = tokens
            .issue_with_ttl("a@x.com", Duration::seconds(-30))
            .unwrap();
        let req = TestRequest::default()
            .app_data(tokens)
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", expired)))
            .to_http_request();

        assert_unauthorized(extract(req).await.unwrap_err());
    }

    #[actix_rt::test]
    async fn test_foreign_signature_is_unauthorized() {
        let foreign = TokenService::new("someone_else", Duration::minutes(30))
            .issue("a@x.com")
            .unwrap();
        let req = TestRequest::default()
            .app_data(tokens())
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", foreign)))
            .to_http_request();

        assert_unauthorized(extract(req).await.unwrap_err());
    }
}
