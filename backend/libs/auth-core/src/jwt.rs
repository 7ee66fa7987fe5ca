/// Shared JWT module for the backend services
///
/// Provides unified JWT issuance and validation using RS256 (RSA with
/// SHA-256). All services MUST use this module for JWT operations to
/// ensure consistency and prevent algorithm confusion attacks.
///
/// ## Security Design
///
/// - **RS256 ONLY**: No symmetric algorithms (HS256) to prevent confusion attacks
/// - **No hardcoded keys**: All keys loaded from environment variables
/// - **Thread-safe**: Keys loaded once at startup, immutable thereafter
///
/// ## Usage
///
/// Call `initialize_jwt_keys()` during startup before any JWT operations:
///
/// ```rust,no_run
/// use auth_core::jwt;
///
/// let private_key = std::env::var("JWT_PRIVATE_KEY_PEM").expect("JWT_PRIVATE_KEY_PEM required");
/// let public_key = std::env::var("JWT_PUBLIC_KEY_PEM").expect("JWT_PUBLIC_KEY_PEM required");
///
/// jwt::initialize_jwt_keys(&private_key, &public_key)
///     .expect("Failed to initialize JWT keys");
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const ACCESS_TOKEN_EXPIRY_HOURS: i64 = 24;

/// JWT algorithm - MUST be RS256 for all services
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure - standard claims plus application fields
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "access"
    pub token_type: String,
    /// Username
    pub username: String,
    /// Role: "user" or "admin"
    pub role: String,
}

// ============================================================================
// Key Storage
// ============================================================================

/// Thread-safe global storage for JWT keys
///
/// Keys are initialized once at startup and never modified.
/// OnceCell ensures thread-safe initialization without runtime locks.
static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize JWT keys from PEM-formatted strings
///
/// MUST be called during application startup before any JWT operations.
/// Can only be called once - subsequent calls will return an error.
///
/// ## Errors
///
/// Returns error if keys are already initialized, the PEM format is
/// invalid, or a key is not a valid RSA key.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;

    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;

    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    Ok(())
}

/// Initialize JWT keys from the conventional environment variables
///
/// Reads `JWT_PRIVATE_KEY_PEM` and `JWT_PUBLIC_KEY_PEM`.
pub fn initialize_from_env() -> Result<()> {
    let private_key = std::env::var("JWT_PRIVATE_KEY_PEM")
        .map_err(|_| anyhow!("JWT_PRIVATE_KEY_PEM environment variable not set"))?;
    let public_key = std::env::var("JWT_PUBLIC_KEY_PEM")
        .map_err(|_| anyhow!("JWT_PUBLIC_KEY_PEM environment variable not set"))?;

    initialize_jwt_keys(&private_key, &public_key)
}

// ============================================================================
// Internal Key Access
// ============================================================================

/// Get encoding key for token generation
fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

/// Get decoding key for token validation
fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate a new access token
///
/// ## Arguments
///
/// * `user_id` - User's UUID
/// * `username` - User's username
/// * `role` - User's role ("user" or "admin")
///
/// ## Returns
///
/// JWT token string encoded with RS256, valid for 24 hours.
pub fn generate_access_token(user_id: Uuid, username: &str, role: &str) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::hours(ACCESS_TOKEN_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: "access".to_string(),
        username: username.to_string(),
        role: role.to_string(),
    };

    let encoding_key = get_encoding_key()?;
    encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token
///
/// Verifies the RS256 signature using the initialized public key, checks
/// expiration, and validates token structure. NO fallback to weaker
/// algorithms.
///
/// ## Arguments
///
/// * `token` - JWT token string (without "Bearer " prefix)
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let decoding_key = get_decoding_key()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, decoding_key, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract the user ID from validated claims
pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|e| anyhow!("Invalid user ID in token subject: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_pem() {
        // Parsing fails before either OnceCell is touched, so this does not
        // poison later initialization in the process.
        let result = initialize_jwt_keys("not a pem", "also not a pem");
        assert!(result.is_err());
    }

    #[test]
    fn claims_serde_round_trip() {
        let claims = Claims {
            sub: Uuid::nil().to_string(),
            iat: 1_700_000_000,
            exp: 1_700_086_400,
            token_type: "access".to_string(),
            username: "sameer".to_string(),
            role: "user".to_string(),
        };

        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, claims.sub);
        assert_eq!(back.exp, claims.exp);
        assert_eq!(back.role, "user");
    }

    #[test]
    fn user_id_from_claims_rejects_non_uuid_subject() {
        let claims = Claims {
            sub: "42".to_string(),
            iat: 0,
            exp: 0,
            token_type: "access".to_string(),
            username: "x".to_string(),
            role: "user".to_string(),
        };
        assert!(user_id_from_claims(&claims).is_err());
    }
}
