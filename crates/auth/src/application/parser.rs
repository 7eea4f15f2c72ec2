//! Auth Data Parser
//!
//! Turns a raw server response into the user, token and level the session
//! store needs. Hosts may replace the default parser, so its output is
//! never trusted before [`sanitize_parsed_data`] has checked it.

use http::{HeaderMap, StatusCode};
use kernel::diagnostic::{Diagnostic, DiagnosticSink};
use serde_json::Value;

use crate::domain::entity::current_user::CurrentUser;
use crate::domain::transport::TransportResponse;
use crate::domain::value_object::auth_level::AuthLevel;

const PARSER_ORIGIN: &str = "AuthServiceProvider.parseHttpAuthData";
const PARSER_MESSAGE: &str = "Invalid callback passed. The Callback must return an object like {user: Object, token: String, authLevel: Number}";

/// Parser output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAuthData {
    pub user: Option<Value>,
    pub token: Option<String>,
    pub auth_level: Option<u64>,
}

impl ParsedAuthData {
    pub fn new(user: Value, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
            auth_level: None,
        }
    }

    pub fn with_auth_level(mut self, level: u64) -> Self {
        self.auth_level = Some(level);
        self
    }

    /// User is a JSON object and the token is non-empty
    pub fn is_valid(&self) -> bool {
        matches!(self.user, Some(Value::Object(_)))
            && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Response-to-auth-data transform
pub trait AuthDataParser: Send + Sync {
    fn parse(&self, body: &Value, headers: &HeaderMap, status: StatusCode) -> ParsedAuthData;
}

impl<F> AuthDataParser for F
where
    F: Fn(&Value, &HeaderMap, StatusCode) -> ParsedAuthData + Send + Sync,
{
    fn parse(&self, body: &Value, headers: &HeaderMap, status: StatusCode) -> ParsedAuthData {
        self(body, headers, status)
    }
}

/// Reads everything from the body: the body is the user, `token` and
/// `authLevel` are fields of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAuthDataParser;

impl AuthDataParser for DefaultAuthDataParser {
    fn parse(&self, body: &Value, _headers: &HeaderMap, _status: StatusCode) -> ParsedAuthData {
        ParsedAuthData {
            user: Some(body.clone()),
            token: body.get("token").and_then(Value::as_str).map(str::to_string),
            auth_level: body
                .get("authLevel")
                .and_then(AuthLevel::from_json)
                .map(|level| level.value()),
        }
    }
}

/// Check parser output, replacing invalid data with nothing
pub fn sanitize_parsed_data(parsed: ParsedAuthData, sink: &dyn DiagnosticSink) -> ParsedAuthData {
    if parsed.is_valid() {
        if let Some(user) = &parsed.user {
            report_malformed_level(user, parsed.auth_level, PARSER_ORIGIN, sink);
        }
        return parsed;
    }
    sink.report(Diagnostic::new(PARSER_ORIGIN, PARSER_MESSAGE));
    ParsedAuthData::default()
}

/// Report a profile `authLevel` that will be read as 0
///
/// Only applies when no positive level was given explicitly.
pub(crate) fn report_malformed_level(
    user: &Value,
    auth_level: Option<u64>,
    origin: &'static str,
    sink: &dyn DiagnosticSink,
) {
    if auth_level.is_some_and(|level| level > 0) {
        return;
    }
    if let Some(level) = CurrentUser::malformed_level(user) {
        sink.report(Diagnostic::new(
            origin,
            format!("authLevel must be a non-negative integer, got {level}; using 0"),
        ));
    }
}

/// Parse then sanitize a response
pub(crate) fn resolve(
    parser: &dyn AuthDataParser,
    response: &TransportResponse,
    sink: &dyn DiagnosticSink,
) -> ParsedAuthData {
    let parsed = parser.parse(&response.data, &response.headers, response.status);
    sanitize_parsed_data(parsed, sink)
}
