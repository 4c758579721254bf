//! Resourceful route expansion.
//!
//! `resources` and `resource` are pure route-table sugar: they expand a
//! CRUD-capable responder object into a fixed set of registrations and add
//! no matching logic of their own.

use std::sync::Arc;

use async_trait::async_trait;
use http::{Method, StatusCode};

use skiff_http::protocol::{Request, Response};
use skiff_http::responder::{BoxError, Responder};

use super::RouterBuilder;

/// A responder object exposing one method per CRUD action.
///
/// Every action defaults to `405 Method Not Allowed`, so implementors only
/// spell out the actions their resource supports.
#[async_trait]
pub trait ResourceResponder: Send + Sync {
    async fn index(&self, request: Request) -> Result<Response, BoxError> {
        let _ = request;
        Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED))
    }

    async fn create(&self, request: Request) -> Result<Response, BoxError> {
        let _ = request;
        Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED))
    }

    async fn show(&self, request: Request) -> Result<Response, BoxError> {
        let _ = request;
        Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED))
    }

    async fn update(&self, request: Request) -> Result<Response, BoxError> {
        let _ = request;
        Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED))
    }

    async fn destroy(&self, request: Request) -> Result<Response, BoxError> {
        let _ = request;
        Ok(Response::new(StatusCode::METHOD_NOT_ALLOWED))
    }
}

#[derive(Clone, Copy)]
enum Action {
    Index,
    Create,
    Show,
    Update,
    Destroy,
}

/// Adapts one CRUD action of a shared resource into a [`Responder`].
struct ResourceAction<R> {
    resource: Arc<R>,
    action: Action,
}

#[async_trait]
impl<R: ResourceResponder + 'static> Responder for ResourceAction<R> {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        match self.action {
            Action::Index => self.resource.index(request).await,
            Action::Create => self.resource.create(request).await,
            Action::Show => self.resource.show(request).await,
            Action::Update => self.resource.update(request).await,
            Action::Destroy => self.resource.destroy(request).await,
        }
    }
}

fn action<R: ResourceResponder + 'static>(resource: &Arc<R>, action: Action) -> Arc<dyn Responder> {
    Arc::new(ResourceAction { resource: Arc::clone(resource), action })
}

impl RouterBuilder {
    /// Expands a collection resource into the index/create/show/update/
    /// destroy quintet:
    ///
    /// - `GET    path`      → `index`
    /// - `POST   path`      → `create`
    /// - `GET    path/:id`  → `show`
    /// - `PUT | PATCH path/:id` → `update`
    /// - `DELETE path/:id`  → `destroy`
    pub fn resources<R: ResourceResponder + 'static>(self, path: &str, resource: R) -> Self {
        let resource = Arc::new(resource);
        let id_path = format!("{path}/:id");

        self.route(path, vec![Method::GET], action(&resource, Action::Index))
            .route(path, vec![Method::POST], action(&resource, Action::Create))
            .route(&id_path, vec![Method::GET], action(&resource, Action::Show))
            .route(&id_path, vec![Method::PUT, Method::PATCH], action(&resource, Action::Update))
            .route(&id_path, vec![Method::DELETE], action(&resource, Action::Destroy))
    }

    /// Expands a singleton resource into the create/show/update/destroy
    /// quad, all registered on `path` itself.
    pub fn resource<R: ResourceResponder + 'static>(self, path: &str, resource: R) -> Self {
        let resource = Arc::new(resource);

        self.route(path, vec![Method::POST], action(&resource, Action::Create))
            .route(path, vec![Method::GET], action(&resource, Action::Show))
            .route(path, vec![Method::PUT, Method::PATCH], action(&resource, Action::Update))
            .route(path, vec![Method::DELETE], action(&resource, Action::Destroy))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Router;
    use super::*;
    use http::Uri;
    use skiff_http::protocol::Body;

    struct Notes;

    #[async_trait]
    impl ResourceResponder for Notes {
        async fn index(&self, _request: Request) -> Result<Response, BoxError> {
            Ok(Response::with_body(StatusCode::OK, Body::text("index")))
        }

        async fn create(&self, _request: Request) -> Result<Response, BoxError> {
            Ok(Response::with_body(StatusCode::CREATED, Body::text("create")))
        }

        async fn show(&self, _request: Request) -> Result<Response, BoxError> {
            Ok(Response::with_body(StatusCode::OK, Body::text("show")))
        }
    }

    fn request(method: Method, path: &'static str) -> Request {
        Request::builder().method(method).uri(Uri::from_static(path)).body(Body::empty())
    }

    #[tokio::test]
    async fn resources_registers_the_quintet() {
        let router = Router::builder().resources("/notes", Notes).build().unwrap();

        assert_eq!(router.paths(), vec!["/notes", "/notes/:id"]);

        let index = router.respond(request(Method::GET, "/notes")).await.unwrap();
        assert_eq!(index.body().data(), b"index");

        let create = router.respond(request(Method::POST, "/notes")).await.unwrap();
        assert_eq!(create.status(), StatusCode::CREATED);

        let show = router.respond(request(Method::GET, "/notes/:id")).await.unwrap();
        assert_eq!(show.body().data(), b"show");

        // update was not overridden, so the default kicks in
        let update = router.respond(request(Method::PUT, "/notes/:id")).await.unwrap();
        assert_eq!(update.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn resource_registers_the_quad_on_the_path_itself() {
        let router = Router::builder().resource("/profile", Notes).build().unwrap();

        assert_eq!(router.paths(), vec!["/profile"]);

        let show = router.respond(request(Method::GET, "/profile")).await.unwrap();
        assert_eq!(show.body().data(), b"show");

        let patch = router.respond(request(Method::PATCH, "/profile")).await.unwrap();
        assert_eq!(patch.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn resources_nest_under_groups() {
        let router = Router::builder().group("/api", |api| api.resources("/notes", Notes)).build().unwrap();

        assert_eq!(router.paths(), vec!["/api/notes", "/api/notes/:id"]);
    }
}
