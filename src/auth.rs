use crate::db::CredentialLookup;
use crate::error::AuthError;
use crate::models::{Claims, Credentials, PublicUser};
use crate::state::AppState;
use actix_web::{dev::ServiceRequest, web, Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Checks a username/password pair against the store.
///
/// Unknown users and wrong passwords both yield `None`, so callers cannot
/// tell the two apart. Passwords are compared as plain strings.
// TODO: swap the plain comparison for a salted hash check once stored
// records carry hashes instead of plaintext.
pub fn validate_credentials(
    store: &dyn CredentialLookup,
    credentials: &Credentials,
) -> Option<PublicUser> {
    let user = store.find_by_username(&credentials.username)?;
    if user.password != credentials.password {
        return None;
    }
    Some(user.public())
}

/// `now + ttl_secs`, or `None` when the result is not a representable time.
pub fn expiry_after(
    now: chrono::DateTime<chrono::Utc>,
    ttl_secs: i64,
) -> Option<chrono::DateTime<chrono::Utc>> {
    now.checked_add_signed(chrono::Duration::try_seconds(ttl_secs)?)
}

/// Signs and verifies HS256 tokens with one shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs,
        }
    }

    pub fn issue(&self, user: &PublicUser) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let expiration = expiry_after(now, self.ttl_secs)
            .ok_or_else(|| AuthError::TokenIssue("expiry out of range".to_string()))?;

        self.sign(&Claims {
            user: user.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Rejects bad signatures, malformed tokens and expired tokens alike.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AuthError::Unauthorized
            })
    }
}

/// Bearer guard for protected routes. On success the verified user is
/// stored in the request extensions for the handler to pick up.
///
/// A missing or non-Bearer header arrives as `None` and is rejected with the
/// same error as a bad token.
pub async fn validator(
    req: ServiceRequest,
    credentials: Option<BearerAuth>,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(credentials) = credentials else {
        tracing::debug!("Bearer credentials missing");
        return Err((AuthError::Unauthorized.into(), req));
    };

    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        tracing::error!("AppState missing from guarded route");
        return Err((AuthError::Unauthorized.into(), req));
    };

    match state.tokens.verify(credentials.token()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims.user);
            Ok(req)
        }
        Err(e) => Err((e.into(), req)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryUsers;

    const SECRET: &str = "test-secret";

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    fn davirds() -> PublicUser {
        PublicUser {
            id: 1,
            username: "davirds".into(),
        }
    }

    #[test]
    fn matching_credentials_return_public_user() {
        let store = InMemoryUsers::seeded();
        assert_eq!(
            validate_credentials(&store, &creds("davirds", "123")),
            Some(davirds())
        );
    }

    #[test]
    fn wrong_password_and_unknown_user_both_fail() {
        let store = InMemoryUsers::seeded();
        assert_eq!(validate_credentials(&store, &creds("davirds", "wrong")), None);
        assert_eq!(validate_credentials(&store, &creds("nobody", "123")), None);
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let tokens = TokenService::new(SECRET, 3600);
        let token = tokens.issue(&davirds()).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user, davirds());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn payload_never_carries_password() {
        let tokens = TokenService::new(SECRET, 3600);
        let token = tokens.issue(&davirds()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let raw = decode::<serde_json::Value>(&token, &DecodingKey::from_secret(&[]), &validation)
            .unwrap()
            .claims;
        let keys: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
        assert!(!keys.contains(&"password"));
        assert_eq!(raw["username"], "davirds");
    }

    #[test]
    fn expired_token_rejected() {
        let tokens = TokenService::new(SECRET, 3600);
        let now = chrono::Utc::now().timestamp();
        let token = tokens
            .sign(&Claims {
                user: davirds(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn unrepresentable_expiry_is_token_issue_error() {
        for ttl in [i64::MAX, 10_000_000_000_000_000, 10_000_000_000_000] {
            let tokens = TokenService::new(SECRET, ttl);
            assert!(
                matches!(tokens.issue(&davirds()), Err(AuthError::TokenIssue(_))),
                "ttl {ttl} did not fail cleanly"
            );
        }
    }

    #[test]
    fn wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a", 3600);
        let verifier = TokenService::new("secret-b", 3600);
        let token = issuer.issue(&davirds()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn garbage_rejected() {
        let tokens = TokenService::new(SECRET, 3600);
        assert!(tokens.verify("").is_err());
        assert!(tokens.verify("not.a.token").is_err());
    }

    #[test]
    fn any_single_bit_flip_rejected() {
        let tokens = TokenService::new(SECRET, 3600);
        let token = tokens.issue(&davirds()).unwrap();
        assert!(tokens.verify(&token).is_ok());

        let bytes = token.as_bytes();
        for i in 0..bytes.len() {
            for bit in 0..8 {
                let mut mutated = bytes.to_vec();
                mutated[i] ^= 1 << bit;
                let Ok(mutated) = String::from_utf8(mutated) else {
                    continue;
                };
                assert!(
                    tokens.verify(&mutated).is_err(),
                    "flip of bit {bit} at byte {i} was accepted"
                );
            }
        }
    }
}
