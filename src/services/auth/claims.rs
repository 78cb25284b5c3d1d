/*
 * Responsibility
 * - 検証済み token の claim 集合 (Claims) の型
 * - claim 値の型変換 (string / number / bool / string 配列) を明示的に失敗させる
 * - identity claim (既定: sub) の取り出し
 */
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::AuthError;

pub const DEFAULT_IDENTITY_CLAIM: &str = "sub";

/// Verified claim set.
///
/// Only [`TokenVerifier`](super::TokenVerifier) produces this from a token, after the
/// signature and time checks passed. Values are kept as JSON; use the typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// String claim. Missing and wrong-typed claims are errors.
    pub fn str(&self, name: &str) -> Result<&str, AuthError> {
        match self.require(name)? {
            Value::String(s) => Ok(s),
            other => Err(type_error(name, "string", other)),
        }
    }

    /// Integer claim (e.g. `exp`, `iat`). Floats with no fractional part are accepted.
    pub fn i64(&self, name: &str) -> Result<i64, AuthError> {
        let value = self.require(name)?;
        as_timestamp(value).ok_or_else(|| type_error(name, "integer", value))
    }

    pub fn bool(&self, name: &str) -> Result<bool, AuthError> {
        match self.require(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(type_error(name, "boolean", other)),
        }
    }

    /// A claim that may be a single string or an array of strings (`aud`, `roles`).
    pub fn string_list(&self, name: &str) -> Result<Vec<String>, AuthError> {
        match self.require(name)? {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => items
                .iter()
                .map(|v| match v {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(type_error(name, "array of strings", other)),
                })
                .collect(),
            other => Err(type_error(name, "string or array of strings", other)),
        }
    }

    /// The `sub` claim.
    pub fn subject(&self) -> Result<&str, AuthError> {
        self.str(DEFAULT_IDENTITY_CLAIM)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    fn require(&self, name: &str) -> Result<&Value, AuthError> {
        self.0
            .get(name)
            .ok_or_else(|| AuthError::MissingClaim(name.to_string()))
    }

    /// Only an object-shaped payload is a usable claim set.
    pub(crate) fn from_payload(payload: Value) -> Result<Self, AuthError> {
        match payload {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AuthError::invalid_claims(format!(
                "payload is {}, expected an object",
                kind_of(&other)
            ))),
        }
    }
}

// Building claims by hand is for callers that already trust the data (tests, fixtures).
impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Look up the identity claim and return it as a string.
pub fn get_identity(claims: &Claims, claim_name: &str) -> Result<String, AuthError> {
    claims.str(claim_name).map(str::to_string)
}

fn as_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

/// RFC 7519 NumericDate: integer or fractional seconds, truncated toward the past.
pub(crate) fn numeric_date(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.floor() as i64)
        }),
        _ => None,
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(name: &str, expected: &'static str, found: &Value) -> AuthError {
    AuthError::ClaimType {
        claim: name.to_string(),
        expected,
        found: kind_of(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        Claims::from_payload(value).unwrap()
    }

    #[test]
    fn identity_from_sub() {
        let expected = "1BAYHSZLIFRybNHu1ZSX7PIJeHC";
        let c = claims(json!({ "sub": expected }));
        assert_eq!(get_identity(&c, DEFAULT_IDENTITY_CLAIM).unwrap(), expected);
        assert_eq!(c.subject().unwrap(), expected);
    }

    #[test]
    fn identity_missing() {
        let c = claims(json!({ "kmlo": "wrong" }));
        assert_eq!(
            get_identity(&c, "sub"),
            Err(AuthError::MissingClaim("sub".to_string()))
        );
    }

    #[test]
    fn identity_wrong_type() {
        let c = claims(json!({ "sub": 42 }));
        assert_eq!(
            get_identity(&c, "sub"),
            Err(AuthError::ClaimType {
                claim: "sub".to_string(),
                expected: "string",
                found: "number",
            })
        );
    }

    #[test]
    fn identity_custom_claim_name() {
        let c = claims(json!({ "sub": "user", "client_id": "svc-a" }));
        assert_eq!(get_identity(&c, "client_id").unwrap(), "svc-a");
    }

    #[test]
    fn typed_accessors() {
        let c = claims(json!({
            "exp": 1_700_000_000,
            "float_exp": 1_700_000_000.0,
            "admin": true,
            "aud": "api",
            "roles": ["a", "b"],
            "mixed": ["a", 1],
        }));

        assert_eq!(c.i64("exp").unwrap(), 1_700_000_000);
        assert_eq!(c.i64("float_exp").unwrap(), 1_700_000_000);
        assert!(c.bool("admin").unwrap());
        assert_eq!(c.string_list("aud").unwrap(), vec!["api".to_string()]);
        assert_eq!(c.string_list("roles").unwrap(), vec!["a", "b"]);
        assert!(matches!(
            c.string_list("mixed"),
            Err(AuthError::ClaimType { .. })
        ));
        assert!(matches!(c.bool("aud"), Err(AuthError::ClaimType { .. })));
        assert!(matches!(c.i64("nope"), Err(AuthError::MissingClaim(_))));
    }

    #[test]
    fn numeric_dates_floor_fractions() {
        assert_eq!(numeric_date(&json!(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(numeric_date(&json!(1_700_000_000.9)), Some(1_700_000_000));
        assert_eq!(numeric_date(&json!(-0.5)), Some(-1));
        assert_eq!(numeric_date(&json!("1700000000")), None);
        assert_eq!(numeric_date(&json!(null)), None);

        // the typed accessor stays strict
        let c = claims(json!({ "exp": 1.5 }));
        assert!(matches!(c.i64("exp"), Err(AuthError::ClaimType { .. })));
    }

    #[test]
    fn non_object_payload_is_invalid() {
        for payload in [json!([1, 2]), json!("sub"), json!(null), json!(3)] {
            assert!(matches!(
                Claims::from_payload(payload),
                Err(AuthError::InvalidClaims(_))
            ));
        }
    }

    #[test]
    fn serializes_as_plain_object() {
        let c = claims(json!({ "sub": "id1" }));
        assert_eq!(serde_json::to_value(&c).unwrap(), json!({ "sub": "id1" }));
    }
}
