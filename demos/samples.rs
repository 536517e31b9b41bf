//! A sample store bound with verbum: verb-named methods, no route table.
//!
//! Run with:
//!   RUST_LOG=verbum=debug cargo run --example samples
//!
//! Try:
//!   curl -X POST http://localhost:3000/api/v1/samples \
//!        -H 'content-type: application/json' \
//!        -d '{"message":"hello"}'
//!   curl http://localhost:3000/api/v1/samples/0
//!   curl -X PUT http://localhost:3000/api/v1/samples/0 -d '{"message":"bye"}'
//!   curl -X DELETE http://localhost:3000/api/v1/samples/0
//!
//! `VERBUM_ADDR` and `VERBUM_PREFIX` override the listen address and prefix.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use verbum::middleware::{self, Flow};
use verbum::{Api, ApplicationError, Json, Middlewares, Request, Resource, Router, Routes, Server, ServerConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
struct Sample {
    message: String,
}

struct Samples {
    store: Mutex<HashMap<String, Sample>>,
    offset: AtomicUsize,
    middleware: Middlewares,
}

impl Samples {
    fn new() -> Self {
        let mut table = Middlewares::new();
        table
            .register_all(&["GET", "POST", "PUT", "DELETE"], middleware::trace)
            .register("GET", stamp);
        Self { store: Mutex::default(), offset: AtomicUsize::new(0), middleware: table }
    }

    fn store(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Sample>>, ApplicationError> {
        self.store.lock().map_err(|_| ApplicationError::failure("sample store poisoned"))
    }

    // POST /api/v1/samples
    fn post(&self, sample: Json<Sample>) -> Result<(Value, StatusCode), ApplicationError> {
        let id = self.offset.fetch_add(1, Ordering::SeqCst).to_string();
        let message = sample.message.clone();
        self.store()?.insert(id.clone(), sample.into_inner());
        Ok((json!({ "id": id, "message": message }), StatusCode::CREATED))
    }

    // GET /api/v1/samples/:string1
    fn get(&self, id: String) -> Result<Json<Sample>, ApplicationError> {
        self.store()?
            .get(&id)
            .cloned()
            .map(Json)
            .ok_or_else(|| ApplicationError::with_status(StatusCode::NOT_FOUND, format!("no sample {id}")))
    }

    // PUT /api/v1/samples/:string1
    fn put(&self, id: String, _req: Request, sample: Json<Sample>) -> Result<StatusCode, ApplicationError> {
        self.store()?.insert(id, sample.into_inner());
        Ok(StatusCode::NO_CONTENT)
    }

    // DELETE /api/v1/samples/:string1
    fn delete(&self, id: String) -> Result<StatusCode, ApplicationError> {
        self.store()?.remove(&id);
        Ok(StatusCode::NO_CONTENT)
    }
}

impl Resource for Samples {
    fn routes() -> Routes<Self> {
        Routes::new()
            .method("Post", Self::post)
            .method("Get", Self::get)
            .method("Put", Self::put)
            .method("Delete", Self::delete)
    }

    fn middleware(&self) -> Option<&Middlewares> {
        Some(&self.middleware)
    }
}

async fn stamp(req: Request) -> Flow {
    info!(path = req.path(), "sample read");
    Flow::Continue(req)
}

#[tokio::main]
async fn main() -> Result<(), verbum::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let mut router = Router::new();
    for bound in Api::from_config(&config).resource("/samples", Samples::new()).register(&mut router)? {
        for (method, path) in &bound.routes {
            info!(%method, %path, "ready");
        }
    }

    Server::from_config(&config).serve(router).await
}
