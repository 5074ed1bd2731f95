//! Decoration fan-out: the namespace must be reachable from the server
//! extension point and, through the queued router layer, from every request.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Extension, Router};
use common::{FakeClient, FakeConnection};
use mongo_provision::{
    register_with_client, ConnectionOptions, Decoration, MongoConnection, Namespace, PluginOptions,
    Server,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tower::ServiceExt;

type FakeNamespace = Arc<Namespace<FakeConnection>>;

async fn database_name(Extension(namespace): Extension<FakeNamespace>) -> String {
    namespace
        .single()
        .map(|mongo| mongo.connection.name().to_string())
        .unwrap_or_default()
}

#[tokio::test]
async fn decorates_both_server_and_request_extension_points() {
    let server = Server::new();
    let options = PluginOptions::single(ConnectionOptions::new("mongodb://localhost:27017/test"))
        .decorations(vec![Decoration::Server, Decoration::Request]);
    register_with_client(&server, &FakeClient::default(), options)
        .await
        .unwrap();

    // server extension point
    let decorated = server.decoration::<FakeNamespace>().expect("server decoration");
    assert_eq!(decorated.single().unwrap().connection.name(), "test");

    // request extension point: every handled request sees the namespace
    let router = Router::new().route("/db", get(database_name));
    let app = server.apply_request_decorations(router);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/db").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"test");
    }
}

#[tokio::test]
async fn no_decorations_means_internal_exposure_only() {
    let server = Server::new();
    register_with_client(
        &server,
        &FakeClient::default(),
        PluginOptions::single(ConnectionOptions::new("mongodb://localhost:27017/test")),
    )
    .await
    .unwrap();

    assert!(server.app_state::<FakeNamespace>().is_some());
    assert!(server.decoration::<FakeNamespace>().is_none());

    let router = server.apply_request_decorations(Router::new().route("/db", get(database_name)));
    // handler extraction fails without the Extension layer
    let response = router
        .oneshot(Request::builder().uri("/db").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
