//! Example consumer: a separate Rust project that uses mongo-provision as a
//! dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Requires a reachable MongoDB (default `mongodb://localhost:27017/test`,
//! override with `MONGODB_URI`).

use axum::routing::get;
use axum::{Extension, Json, Router};
use mongo_provision::{
    register, schema_factory, ConnectionOptions, Decoration, MongoNamespace, PluginOptions, Server,
};
use serde_json::json;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mongo_provision=info")),
        )
        .init();

    let uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017/test".into());

    let server = Server::new();

    // log admin creations emitted by the schema factory hook
    let mut events = server.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(event = %event.name, payload = %event.payload, "server event");
        }
    });

    let options = PluginOptions::single(
        ConnectionOptions::new(uri)
            .schema_patterns(["example_consumer/schemas/**/*.json", "!**/*.txt"]),
    )
    .decorations(vec![Decoration::Server, Decoration::Request])
    .factory(
        "admin",
        schema_factory(|server: Server| async move {
            server.emit("admin-schema-loaded", json!({}));
            Ok(json!({
                "fields": { "name": "String", "last": "String" }
            }))
        }),
    );

    register(&server, options).await?;

    let router = Router::new().route("/models", get(list_models));
    let app = server.apply_request_decorations(router);

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("example consumer listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn list_models(Extension(namespace): Extension<MongoNamespace>) -> Json<serde_json::Value> {
    let models: Vec<&String> = namespace
        .single()
        .map(|mongo| mongo.models.keys().collect())
        .unwrap_or_default();
    Json(json!({ "models": models }))
}
