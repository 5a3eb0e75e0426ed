use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use onboard_core::UserProfile;

use crate::problem::{FieldError, LocSegment, ProblemResponse};

/// Shape check run against the raw JSON before it is deserialized.
///
/// Returns every failure found, not just the first, so a client can fix all
/// of its fields in one round trip.
pub trait BodySchema: DeserializeOwned {
    fn check(value: &Value) -> Vec<FieldError>;
}

/// JSON body extractor that rejects malformed input with a 422 problem
/// listing the offending fields, before the handler runs.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: BodySchema,
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !accepts_as_json(req.headers()) {
            return Err(ProblemResponse::validation(vec![FieldError::new(
                vec![LocSegment::body()],
                "content_type",
                "Expected request with `Content-Type: application/json`",
            )]));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ProblemResponse::new(rejection.status(), "invalid_body", rejection.body_text())
        })?;

        parse_body(&bytes)
            .map(ValidatedJson)
            .map_err(ProblemResponse::validation)
    }
}

/// A body without `Content-Type` is read as JSON; a declared non-JSON type is not.
fn accepts_as_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Parses `bytes` as JSON, runs the schema check and deserializes into `T`.
pub fn parse_body<T: BodySchema>(bytes: &[u8]) -> Result<T, Vec<FieldError>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|err| {
        vec![FieldError::new(
            vec![LocSegment::body()],
            "json_invalid",
            format!("JSON decode error: {err}"),
        )]
    })?;

    let errors = T::check(&value);
    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(value).map_err(|err| {
        vec![FieldError::new(
            vec![LocSegment::body()],
            "invalid_value",
            err.to_string(),
        )]
    })
}

impl BodySchema for UserProfile {
    fn check(value: &Value) -> Vec<FieldError> {
        let Some(object) = value.as_object() else {
            return vec![FieldError::new(
                vec![LocSegment::body()],
                "invalid_type",
                "Input should be a valid object",
            )];
        };

        let mut errors = Vec::new();
        check_string(object, "name", &mut errors);
        check_string(object, "email", &mut errors);
        check_string_list(object, "skills", true, &mut errors);
        check_string_list(object, "interests", false, &mut errors);
        errors
    }
}

fn field_loc(field: &str) -> Vec<LocSegment> {
    vec![LocSegment::body(), LocSegment::Key(field.to_string())]
}

fn check_string(object: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) {
    match object.get(field) {
        None => errors.push(FieldError::new(field_loc(field), "missing", "Field required")),
        Some(Value::String(_)) => {}
        Some(_) => errors.push(FieldError::new(
            field_loc(field),
            "invalid_type",
            "Input should be a valid string",
        )),
    }
}

// An optional list may be absent, but `null` is still rejected.
fn check_string_list(
    object: &Map<String, Value>,
    field: &str,
    required: bool,
    errors: &mut Vec<FieldError>,
) {
    match object.get(field) {
        None if required => {
            errors.push(FieldError::new(field_loc(field), "missing", "Field required"))
        }
        None => {}
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    let mut loc = field_loc(field);
                    loc.push(LocSegment::Index(index));
                    errors.push(FieldError::new(
                        loc,
                        "invalid_type",
                        "Input should be a valid string",
                    ));
                }
            }
        }
        Some(_) => errors.push(FieldError::new(
            field_loc(field),
            "invalid_type",
            "Input should be a valid list",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn key(name: &str) -> LocSegment {
        LocSegment::Key(name.to_string())
    }

    #[test]
    fn accepts_well_formed_profile() {
        let profile: UserProfile =
            parse_body(br#"{"name":"Ada","email":"ada@example.com","skills":["python"]}"#)
                .expect("valid body");
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.skills, vec!["python"]);
        assert_eq!(profile.interests, None);
    }

    #[test]
    fn missing_field_points_at_field() {
        let errors = parse_body::<UserProfile>(br#"{"name":"Ada","skills":["python"]}"#)
            .expect_err("email is missing");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec![LocSegment::body(), key("email")]);
        assert_eq!(errors[0].kind, "missing");
        assert_eq!(errors[0].msg, "Field required");
    }

    #[test]
    fn empty_object_reports_every_required_field() {
        let errors = parse_body::<UserProfile>(b"{}").expect_err("nothing was sent");
        let locs: Vec<_> = errors.iter().map(|err| err.loc.clone()).collect();
        assert_eq!(
            locs,
            vec![
                vec![LocSegment::body(), key("name")],
                vec![LocSegment::body(), key("email")],
                vec![LocSegment::body(), key("skills")],
            ]
        );
        assert!(errors.iter().all(|err| err.kind == "missing"));
    }

    #[test]
    fn every_bad_skill_is_reported() {
        let errors = parse_body::<UserProfile>(
            br#"{"name":"Ada","email":"ada@example.com","skills":["python",42,true]}"#,
        )
        .expect_err("skills must be strings");
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].loc,
            vec![LocSegment::body(), key("skills"), LocSegment::Index(1)]
        );
        assert_eq!(
            errors[1].loc,
            vec![LocSegment::body(), key("skills"), LocSegment::Index(2)]
        );
        assert!(errors.iter().all(|err| err.kind == "invalid_type"));
    }

    #[test]
    fn mixed_failures_are_collected_together() {
        let errors =
            parse_body::<UserProfile>(br#"{"name":null,"skills":"python","interests":5}"#)
                .expect_err("several fields are wrong");
        let summary: Vec<_> = errors
            .iter()
            .map(|err| (err.loc.last().cloned(), err.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some(key("name")), "invalid_type"),
                (Some(key("email")), "missing"),
                (Some(key("skills")), "invalid_type"),
                (Some(key("interests")), "invalid_type"),
            ]
        );
    }

    #[test]
    fn null_interests_are_rejected() {
        let errors = parse_body::<UserProfile>(
            br#"{"name":"Ada","email":"ada@example.com","skills":[],"interests":null}"#,
        )
        .expect_err("null is not a list");
        assert_eq!(errors[0].loc, vec![LocSegment::body(), key("interests")]);
        assert_eq!(errors[0].msg, "Input should be a valid list");
    }

    #[test]
    fn non_object_body_is_rejected_at_root() {
        let errors = parse_body::<UserProfile>(br#""Ada""#).expect_err("strings are not profiles");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc, vec![LocSegment::body()]);
        assert_eq!(errors[0].kind, "invalid_type");
    }

    #[test]
    fn malformed_json_is_reported() {
        let errors = parse_body::<UserProfile>(b"{\"name\": ").expect_err("truncated body");
        assert_eq!(errors[0].loc, vec![LocSegment::body()]);
        assert_eq!(errors[0].kind, "json_invalid");
        assert!(errors[0].msg.starts_with("JSON decode error"));
    }

    #[test]
    fn content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(accepts_as_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(accepts_as_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );
        assert!(accepts_as_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!accepts_as_json(&headers));
    }
}
