use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use skiff_http::protocol::{Body, Request, Response};
use skiff_http::responder::{BoxError, make_responder};
use skiff_web::router::{ResourceResponder, Router};
use skiff_web::server::HttpServer;
use skiff_web::{Json, JsonBodyError};

#[derive(Debug, Serialize, Deserialize)]
struct Note {
    id: u32,
    text: String,
}

struct NoteResponder;

#[async_trait]
impl ResourceResponder for NoteResponder {
    async fn index(&self, _request: Request) -> Result<Response, BoxError> {
        let notes = json!([
            { "id": 1, "text": "ship it" },
            { "id": 2, "text": "write the changelog" },
        ]);
        Ok(Response::with_body(StatusCode::OK, Json(notes).into_body()?))
    }

    async fn create(&self, request: Request) -> Result<Response, BoxError> {
        match Json::<Note>::from_body(request.body()) {
            Ok(Json(note)) => Ok(Response::with_body(StatusCode::CREATED, Json(note).into_body()?)),
            Err(JsonBodyError::NotJson) => {
                Ok(Response::with_body(StatusCode::BAD_REQUEST, Body::text("expected a json body")))
            }
            Err(e) => Ok(Response::with_body(StatusCode::BAD_REQUEST, Body::text(e.to_string()))),
        }
    }
}

// curl -v http://127.0.0.1:8080/hello
// curl -v http://127.0.0.1:8080/api/notes
// curl -v -H 'Content-Type: application/json' -d '{"id":3,"text":"hi"}' http://127.0.0.1:8080/api/notes
#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .get("/hello", make_responder(|_| async {
            Ok(Response::with_body(StatusCode::OK, Body::text("hello world\r\n")))
        }))
        .group("/api", |api| api.resources("/notes", NoteResponder))
        .build()
        .expect("no duplicate routes");

    let Some(handle) = HttpServer::builder().router(router).port(8080).build().expect("a router was set").start()
    else {
        return;
    };

    tokio::signal::ctrl_c().await.ok();
    handle.stop();
}
