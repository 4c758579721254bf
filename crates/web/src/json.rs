//! JSON body sugar.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use skiff_http::protocol::Body;

/// Wraps a serializable value for conversion to and from JSON bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T: Serialize> Json<T> {
    /// Serializes the value into an `application/json` body.
    pub fn into_body(self) -> Result<Body, serde_json::Error> {
        let data = serde_json::to_vec(&self.0)?;
        Ok(Body::bytes(data, mime::APPLICATION_JSON))
    }
}

impl<T: DeserializeOwned> Json<T> {
    /// Reads a value back out of a body that declares itself as JSON.
    ///
    /// Uses the body's capability probe: a payload with any other (or no)
    /// declared content type is rejected without looking at its bytes.
    pub fn from_body(body: &Body) -> Result<Self, JsonBodyError> {
        let data = body.interpret_as(&mime::APPLICATION_JSON).ok_or(JsonBodyError::NotJson)?;
        Ok(Json(serde_json::from_slice(data)?))
    }
}

#[derive(Debug, Error)]
pub enum JsonBodyError {
    #[error("body does not declare application/json")]
    NotJson,

    #[error("malformed json body: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[test]
    fn round_trips_through_a_body() {
        let note = Note { id: 7, text: "pick up milk".into() };
        let body = Json(note).into_body().unwrap();

        assert_eq!(body.content_type(), Some(&mime::APPLICATION_JSON));

        let Json(read_back) = Json::<Note>::from_body(&body).unwrap();
        assert_eq!(read_back, Note { id: 7, text: "pick up milk".into() });
    }

    #[test]
    fn rejects_untyped_bodies() {
        let body = Body::text(r#"{"id":7,"text":"hi"}"#);
        assert!(matches!(Json::<Note>::from_body(&body), Err(JsonBodyError::NotJson)));
    }

    #[test]
    fn rejects_malformed_payloads() {
        let body = Body::bytes("{not json", mime::APPLICATION_JSON);
        assert!(matches!(Json::<Note>::from_body(&body), Err(JsonBodyError::Malformed { .. })));
    }
}
