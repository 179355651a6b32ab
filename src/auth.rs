//! Token verification
//!
//! Sessions are tenant-scoped: the company a session subscribes for comes out
//! of the authentication token, never from the caller. The token is verified
//! against a symmetric signing key stored on the local filesystem.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ItembusError, Result};

/// Issuer every accepted token must carry
pub const EXPECTED_ISSUER: &str = "itembus";

/// Well-known location of the signing key
pub const DEFAULT_KEY_PATH: &str = "/etc/itembus/signing.key";

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    company: Option<String>,
}

/// Read the signing key from a local file
///
/// The key is the file's UTF-8 contents; a trailing newline is ignored.
pub async fn load_signing_key(path: &str) -> Result<String> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents.trim_end().to_string())
}

/// Verify a token and extract the tenant identifier
///
/// The token signature is checked against `key`, the issuer claim must equal
/// [`EXPECTED_ISSUER`], and the `company` claim must be present. Any failure
/// aborts client construction; no unauthenticated session is ever created.
pub fn verify_token(token: &str, key: &str) -> Result<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    // The claims contract is signature + issuer + company; expiry is not part
    // of it.
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.set_issuer(&[EXPECTED_ISSUER]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(key.as_bytes()), &validation)?;

    match data.claims.company {
        Some(company) => {
            debug!(%company, "token verified");
            Ok(company)
        }
        None => Err(ItembusError::MissingCompanyClaim),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const KEY: &str = "test-signing-key";

    #[derive(Serialize)]
    struct TestClaims {
        iss: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        company: Option<String>,
    }

    fn make_token(issuer: &str, company: Option<&str>, key: &str) -> String {
        let claims = TestClaims {
            iss: issuer.to_string(),
            company: company.map(String::from),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let token = make_token(EXPECTED_ISSUER, Some("acme"), KEY);
        assert_eq!(verify_token(&token, KEY).unwrap(), "acme");
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let token = make_token(EXPECTED_ISSUER, Some("acme"), "other-key");
        let err = verify_token(&token, KEY).unwrap_err();
        assert!(matches!(err, ItembusError::Authentication(_)));
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let mut token = make_token(EXPECTED_ISSUER, Some("acme"), KEY);
        // Flip a character in the payload segment
        let dot = token.find('.').unwrap() + 1;
        let original = token.as_bytes()[dot];
        let replacement = if original == b'A' { 'B' } else { 'A' };
        token.replace_range(dot..dot + 1, &replacement.to_string());

        let err = verify_token(&token, KEY).unwrap_err();
        assert!(matches!(err, ItembusError::Authentication(_)));
    }

    #[test]
    fn test_verify_rejects_wrong_issuer() {
        let token = make_token("someone-else", Some("acme"), KEY);
        let err = verify_token(&token, KEY).unwrap_err();
        assert!(matches!(err, ItembusError::Authentication(_)));
    }

    #[test]
    fn test_verify_rejects_missing_issuer() {
        #[derive(Serialize)]
        struct NoIssuer {
            company: String,
        }
        let token = encode(
            &Header::default(),
            &NoIssuer {
                company: "acme".to_string(),
            },
            &EncodingKey::from_secret(KEY.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, KEY).unwrap_err();
        assert!(matches!(err, ItembusError::Authentication(_)));
    }

    #[test]
    fn test_verify_rejects_missing_company() {
        let token = make_token(EXPECTED_ISSUER, None, KEY);
        let err = verify_token(&token, KEY).unwrap_err();
        assert!(matches!(err, ItembusError::MissingCompanyClaim));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let err = verify_token("not-a-token", KEY).unwrap_err();
        assert!(matches!(err, ItembusError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_load_signing_key_trims_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signing.key");
        std::fs::write(&path, "secret-key\n").unwrap();

        let key = load_signing_key(path.to_str().unwrap()).await.unwrap();
        assert_eq!(key, "secret-key");
    }

    #[tokio::test]
    async fn test_load_signing_key_missing_file() {
        let err = load_signing_key("/nonexistent/signing.key").await.unwrap_err();
        assert!(matches!(err, ItembusError::KeyFile(_)));
    }
}
