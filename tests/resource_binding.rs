//! End-to-end: resources bound onto a `Router`, driven in-process.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use http::header::{self, HeaderValue};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use verbum::middleware::{self, Middlewares};
use verbum::resource::{ParamType, Reply};
use verbum::{
    bind, Api, ApplicationError, Error, Json, Method, Request, Resource, Response, Route, Router,
    Routes, SignatureError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn body_json(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("json body")
}

// ── Samples: the three canonical handlers ────────────────────────────────────

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
struct Data {
    name: String,
    tags: Vec<String>,
    score: f64,
}

#[derive(Default)]
struct Samples {
    middleware: Middlewares,
    gets: AtomicUsize,
}

impl Samples {
    fn get(&self, name: String) -> (Value, u16) {
        self.gets.fetch_add(1, Ordering::SeqCst);
        (json!({ "name": name }), 200)
    }

    fn post(&self, _req: Request, payload: Json<Data>) -> (Json<Data>, u16) {
        (payload, 200)
    }
}

impl Resource for Samples {
    fn routes() -> Routes<Self> {
        Routes::new().method("Get", Self::get).method("Post", Self::post)
    }

    fn middleware(&self) -> Option<&Middlewares> {
        Some(&self.middleware)
    }
}

fn samples_router(samples: Samples) -> Router {
    init_tracing();
    let mut router = Router::new();
    let bound = Api::new("/").resource("/samples", samples).register(&mut router).unwrap();
    assert!(bound.iter().all(|b| b.is_complete()));
    router
}

#[tokio::test]
async fn get_with_string_path_parameter() {
    let router = samples_router(Samples::default());
    let res = router.handle(Request::new(Method::Get, "/samples/alice")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.content_type(), Some("application/json"));
    assert_eq!(res.body(), br#"{"name":"alice"}"#);
}

#[tokio::test]
async fn encoded_path_values_arrive_decoded() {
    let router = samples_router(Samples::default());
    for (raw, name) in [("john%20doe", "john doe"), ("caf%C3%A9", "café")] {
        let res = router.handle(Request::new(Method::Get, format!("/samples/{raw}"))).await;
        assert_eq!(res.status(), StatusCode::OK, "{raw}");
        assert_eq!(body_json(&res), json!({ "name": name }), "{raw}");
    }
}

#[tokio::test]
async fn post_echoes_body() {
    let router = samples_router(Samples::default());
    let payload = r#"{"name":"bob","tags":["a","b"],"score":1.5}"#;
    let req = Request::new(Method::Post, "/samples")
        .with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .with_body(payload);
    let res = router.handle(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body(), payload.as_bytes());
}

#[tokio::test]
async fn post_with_undecodable_body_is_400() {
    let router = samples_router(Samples::default());
    let res = router.handle(Request::new(Method::Post, "/samples").with_body(r#"{"name":1}"#)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(&res)["message"].as_str().is_some());
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let router = samples_router(Samples::default());
    let first = router.handle(Request::new(Method::Get, "/samples/carol")).await;
    let second = router.handle(Request::new(Method::Get, "/samples/carol")).await;
    assert_eq!(first.status(), second.status());
    assert_eq!(first.body(), second.body());
    assert_eq!(first.headers(), second.headers());
}

#[tokio::test]
async fn unbound_verb_and_path() {
    let router = samples_router(Samples::default());
    let wrong_verb = router.handle(Request::new(Method::Delete, "/samples/alice")).await;
    assert_eq!(wrong_verb.status(), StatusCode::METHOD_NOT_ALLOWED);
    let wrong_path = router.handle(Request::new(Method::Get, "/other/alice")).await;
    assert_eq!(wrong_path.status(), StatusCode::NOT_FOUND);
}

// ── Middleware ───────────────────────────────────────────────────────────────

async fn require_token(req: Request) -> ControlFlow<Response, Request> {
    match req.header("authorization") {
        Some("Bearer secret") => ControlFlow::Continue(req),
        _ => ControlFlow::Break(Response::message(StatusCode::UNAUTHORIZED, "missing token")),
    }
}

#[tokio::test]
async fn interceptor_short_circuits_before_get() {
    let mut samples = Samples::default();
    samples.middleware.register("GET", middleware::trace).register("get", require_token);

    init_tracing();
    let samples = Arc::new(samples);
    let mut router = Router::new();
    bind(&mut router, Arc::clone(&samples), "/samples").unwrap();

    let denied = router.handle(Request::new(Method::Get, "/samples/alice")).await;
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(&denied), json!({ "message": "missing token" }));
    assert_eq!(samples.gets.load(Ordering::SeqCst), 0);

    let allowed = router
        .handle(
            Request::new(Method::Get, "/samples/alice")
                .with_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret")),
        )
        .await;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(samples.gets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn interceptors_only_guard_their_verb() {
    let mut samples = Samples::default();
    samples.middleware.register("GET", require_token);
    let router = samples_router(samples);

    let res = router
        .handle(Request::new(Method::Post, "/samples").with_body(r#"{"name":"x","tags":[],"score":0}"#))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

// ── Typed path parameters and return shapes ──────────────────────────────────

#[derive(Default)]
struct Items {
    store: Mutex<Vec<String>>,
}

impl Items {
    fn get(&self, id: i64) -> Result<Json<String>, ApplicationError> {
        let store = self.store.lock().unwrap();
        usize::try_from(id)
            .ok()
            .and_then(|i| store.get(i).cloned())
            .map(Json)
            .ok_or_else(|| ApplicationError::with_status(StatusCode::NOT_FOUND, format!("no item {id}")))
    }

    fn put(&self, name: String) -> String {
        let mut store = self.store.lock().unwrap();
        store.push(name);
        (store.len() - 1).to_string()
    }

    fn patch(&self, ratio: f64, enabled: bool) -> Json<Value> {
        Json(json!({ "ratio": ratio, "enabled": enabled }))
    }

    fn delete(&self, _req: Request, _id: i64) {}
}

impl Resource for Items {
    fn routes() -> Routes<Self> {
        Routes::new()
            .method("Get", Self::get)
            .method("PUT", Self::put)
            .method("patch", Self::patch)
            .method("Delete", Self::delete)
    }
}

fn items_router() -> Router {
    init_tracing();
    let mut router = Router::new();
    let bound = bind(&mut router, Arc::new(Items::default()), "/items").unwrap();
    assert_eq!(
        bound.routes,
        vec![
            (Method::Get, "/items/:int1".to_owned()),
            (Method::Put, "/items/:string1".to_owned()),
            (Method::Patch, "/items/:float1/:bool2".to_owned()),
            (Method::Delete, "/items/:int2".to_owned()),
        ],
    );
    router
}

#[tokio::test]
async fn non_numeric_int_is_400_naming_argument() {
    let router = items_router();
    let res = router.handle(Request::new(Method::Get, "/items/notanumber")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let message = body_json(&res)["message"].as_str().unwrap().to_owned();
    assert!(message.contains("int1"), "{message}");
}

#[tokio::test]
async fn non_numeric_float_is_400() {
    let router = items_router();
    let res = router.handle(Request::new(Method::Patch, "/items/abc/true")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&res), json!({ "message": "argument float1 must be float" }));
}

#[tokio::test]
async fn one_value_return_is_200() {
    let router = items_router();
    let put = router.handle(Request::new(Method::Put, "/items/first")).await;
    assert_eq!(put.status(), StatusCode::OK);
    assert_eq!(put.body(), b"0");
    assert_eq!(put.content_type(), Some("text/plain; charset=utf-8"));

    let get = router.handle(Request::new(Method::Get, "/items/0")).await;
    assert_eq!(get.status(), StatusCode::OK);
    assert_eq!(get.body(), b"first");
}

#[tokio::test]
async fn application_error_carries_its_status() {
    let router = items_router();
    let res = router.handle(Request::new(Method::Get, "/items/9")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&res), json!({ "message": "no item 9" }));
}

#[tokio::test]
async fn zero_value_return_is_empty_200() {
    let router = items_router();
    let res = router.handle(Request::new(Method::Delete, "/items/3")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn encoded_int_is_coerced_after_decoding() {
    let router = items_router();
    let res = router.handle(Request::new(Method::Delete, "/items/%34%32")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.handle(Request::new(Method::Delete, "/items/%FF")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn permissive_bool_over_http() {
    let router = items_router();
    for (raw, expected) in [("off", false), ("nil", false), ("no", true), ("1", true)] {
        let res = router.handle(Request::new(Method::Patch, format!("/items/0.5/{raw}"))).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(&res), json!({ "ratio": 0.5, "enabled": expected }), "{raw}");
    }
}

// ── Registration failures ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Other {
    #[allow(dead_code)]
    id: i64,
}

struct Broken;

impl Broken {
    fn get(&self, id: i64) -> String {
        id.to_string()
    }

    fn post(&self, _a: Json<Data>, _b: Json<Other>) {}
}

impl Resource for Broken {
    fn routes() -> Routes<Self> {
        Routes::new()
            .method("Get", Self::get)
            .method("Post", Self::post)
            .route(Route::<Self>::raw("Put", vec![ParamType::Str, ParamType::Unsupported("Vec<u8>")], |_, _| {
                Ok(Reply::empty())
            }))
    }
}

#[tokio::test]
async fn rejected_methods_do_not_stop_the_rest() {
    init_tracing();
    let mut router = Router::new();
    let bound = bind(&mut router, Arc::new(Broken), "/broken").unwrap();

    assert_eq!(bound.routes, vec![(Method::Get, "/broken/:int1".to_owned())]);
    let errors: Vec<_> = bound.rejected.iter().map(|r| (r.method.as_str(), r.error.clone())).collect();
    assert_eq!(
        errors,
        vec![
            ("Post", SignatureError::MultipleBodies { first: 1, second: 2 }),
            ("Put", SignatureError::Unsupported { ty: "Vec<u8>", ordinal: 2 }),
        ],
    );

    let res = router.handle(Request::new(Method::Get, "/broken/5")).await;
    assert_eq!(res.body(), b"5");
    let res = router.handle(Request::new(Method::Post, "/broken")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[test]
fn binding_same_prefix_twice_conflicts() {
    let mut router = Router::new();
    bind(&mut router, Arc::new(Items::default()), "/items").unwrap();
    let err = bind(&mut router, Arc::new(Items::default()), "/items").unwrap_err();
    assert!(matches!(err, Error::Route { method: Method::Get, .. }));
}
