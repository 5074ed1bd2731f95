//! Host server handle: the narrow collaborator surface the plugin consumes.
//!
//! Mirrors what a host framework hands to a plugin at registration time: a
//! process-wide state container, decoration attachment per extension point,
//! an event bus for user-authored schema factories, and a plugin-uniqueness
//! guard. Logging goes through `tracing` under the [`crate::LOG_TARGET`]
//! channel and needs no handle of its own.

use crate::config::Decoration;
use crate::error::PluginError;
use axum::http::Extensions;
use axum::{Extension, Router};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::broadcast;

/// An event emitted on the server bus, e.g. by a schema factory hook.
#[derive(Clone, Debug)]
pub struct Event {
    pub name: String,
    pub payload: Value,
}

type RequestDecorator = Box<dyn Fn(Router) -> Router + Send + Sync>;

struct ServerInner {
    /// Application-scoped state, written once per plugin registration.
    app: RwLock<Extensions>,
    /// Values decorated onto the server extension point.
    decorations: RwLock<Extensions>,
    /// Layers queued for the request extension point; the consumer applies
    /// them to its router via [`Server::apply_request_decorations`].
    request_decorators: Mutex<Vec<RequestDecorator>>,
    plugins: Mutex<HashSet<&'static str>>,
    events: broadcast::Sender<Event>,
}

/// Cheap-to-clone handle onto the host server.
#[derive(Clone)]
pub struct Server {
    inner: Arc<ServerInner>,
}

impl Server {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(ServerInner {
                app: RwLock::new(Extensions::new()),
                decorations: RwLock::new(Extensions::new()),
                request_decorators: Mutex::new(Vec::new()),
                plugins: Mutex::new(HashSet::new()),
                events,
            }),
        }
    }

    /// Stores a value in the application-scoped state container.
    ///
    /// Lock poisoning is not propagated: a panic elsewhere must not take the
    /// state container down with it.
    pub fn set_app_state<T: Clone + Send + Sync + 'static>(&self, value: T) {
        self.inner
            .app
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(value);
    }

    /// Reads a value back from the application-scoped state container.
    pub fn app_state<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.inner
            .app
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<T>()
            .cloned()
    }

    /// Attaches `value` to the given extension point.
    pub fn decorate<T: Clone + Send + Sync + 'static>(&self, point: Decoration, value: T) {
        match point {
            Decoration::Server => {
                self.inner
                    .decorations
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(value);
            }
            Decoration::Request => {
                let decorator: RequestDecorator =
                    Box::new(move |router| router.layer(Extension(value.clone())));
                self.inner
                    .request_decorators
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(decorator);
            }
        }
    }

    /// Reads a value decorated onto the server extension point.
    pub fn decoration<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.inner
            .decorations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<T>()
            .cloned()
    }

    /// Applies every queued request decoration to the router, making the
    /// decorated values extractable in handlers via `Extension<T>`.
    pub fn apply_request_decorations(&self, router: Router) -> Router {
        self.inner
            .request_decorators
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .fold(router, |router, decorate| decorate(router))
    }

    /// Emits an event on the server bus. Events with no subscribers are dropped.
    pub fn emit(&self, name: impl Into<String>, payload: Value) {
        let _ = self.inner.events.send(Event {
            name: name.into(),
            payload,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe()
    }

    /// Claims a plugin name; registering the same plugin twice on one server
    /// is an error, matching the host-framework uniqueness guarantee.
    pub(crate) fn claim_plugin(&self, name: &'static str) -> Result<(), PluginError> {
        if self
            .inner
            .plugins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name)
        {
            Ok(())
        } else {
            Err(PluginError::AlreadyRegistered(name))
        }
    }

    /// Releases a claimed plugin name after a failed registration.
    pub(crate) fn release_plugin(&self, name: &str) {
        self.inner
            .plugins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}
