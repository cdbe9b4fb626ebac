use crate::auth::{validate_credentials, validator};
use crate::error::AuthError;
use crate::models::{LoginRequest, PublicUser};
use crate::state::AppState;
use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;

/// Route table for the auth endpoints. Only `/auth/status` sits behind the
/// bearer guard.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .service(
                web::resource("/status")
                    .wrap(HttpAuthentication::with_fn(validator))
                    .route(web::get().to(status)),
            ),
    );
}

/// Unparseable bodies are reported like any other shape violation.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let detail = match &err {
            JsonPayloadError::ContentType => "content type must be application/json".to_string(),
            JsonPayloadError::Deserialize(e) if e.is_data() => {
                "body must be an object with username and password fields".to_string()
            }
            _ => "request body must be a JSON object".to_string(),
        };
        AuthError::ShapeValidation(vec![detail]).into()
    })
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let credentials = body
        .into_inner()
        .into_credentials()
        .map_err(AuthError::ShapeValidation)?;

    let Some(user) = validate_credentials(state.users.as_ref(), &credentials) else {
        tracing::warn!(username = %credentials.username, "Login rejected");
        return Err(AuthError::InvalidCredentials);
    };

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = user.id, username = %user.username, "Login succeeded");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(token))
}

pub async fn status(user: web::ReqData<PublicUser>) -> HttpResponse {
    tracing::debug!(user_id = user.id, "Status probe");
    HttpResponse::Ok().finish()
}
