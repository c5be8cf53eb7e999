#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use inkbridge_core::{
    ExporterConfig, HttpRequest, HttpResponse, Session, StatInkExporter, Transport, TransportError,
};

pub const BASE: &str = "https://stat.ink.test";
pub const KEY: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJ0123456";

pub const STAGE_PATH: &str = "/api/v3/stage";
pub const ABILITY_PATH: &str = "/api/v3/ability";
pub const SALMON_WEAPON_PATH: &str = "/api/v3/salmon/weapon";
pub const BATTLE_PATH: &str = "/api/v3/battle";
pub const SALMON_PATH: &str = "/api/v3/salmon";

#[derive(Clone)]
enum Reply {
    Respond(u16, Vec<u8>),
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub request: HttpRequest,
}

/// In-memory stat.ink: canned replies per `METHOD path`, every request recorded.
#[derive(Default)]
pub struct FakeStatInk {
    standing: Mutex<HashMap<String, Reply>>,
    queued: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<Recorded>>,
}

fn route(method: &str, path: &str) -> String {
    format!("{method} {path}")
}

impl FakeStatInk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fake preloaded with the stage, ability and salmon weapon catalogs.
    pub fn with_catalogs() -> Arc<Self> {
        let fake = Self::new();
        fake.respond("GET", STAGE_PATH, 200, include_str!("../fixtures/catalog_stage.json"));
        fake.respond("GET", ABILITY_PATH, 200, include_str!("../fixtures/catalog_ability.json"));
        fake.respond(
            "GET",
            SALMON_WEAPON_PATH,
            200,
            include_str!("../fixtures/catalog_salmon_weapon.json"),
        );
        fake
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.standing.lock().unwrap().insert(
            route(method, path),
            Reply::Respond(status, body.as_bytes().to_vec()),
        );
    }

    pub fn fail_once(&self, method: &str, path: &str) {
        self.queued
            .lock()
            .unwrap()
            .entry(route(method, path))
            .or_default()
            .push_back(Reply::Fail("connection reset".to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn posts(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    fn handle(&self, method: &'static str, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request
            .url
            .strip_prefix(BASE)
            .unwrap_or(&request.url)
            .to_string();
        let key = route(method, &path);
        self.requests.lock().unwrap().push(Recorded {
            method,
            path,
            request,
        });
        let queued = self
            .queued
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        let reply = queued.or_else(|| self.standing.lock().unwrap().get(&key).cloned());
        match reply {
            Some(Reply::Respond(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::Fail(reason)) => Err(reason.into()),
            None => Ok(HttpResponse::new(404, format!("no route for {key}"))),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeStatInk {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.handle("GET", request)
    }

    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.handle("POST", request)
    }
}

/// Wraps the fake so every request suspends a few times while in flight and
/// records the highest number of requests outstanding at once.
pub struct Yielding {
    inner: Arc<FakeStatInk>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl Yielding {
    pub fn new(inner: Arc<FakeStatInk>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn suspend(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    fn resume(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Transport for Yielding {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.suspend().await;
        let reply = self.inner.get(request).await;
        self.resume();
        reply
    }

    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.suspend().await;
        let reply = self.inner.post(request).await;
        self.resume();
        reply
    }
}

pub fn config() -> ExporterConfig {
    ExporterConfig {
        api_key: Some(KEY.to_string()),
        upload_mode: "Test".to_string(),
        endpoint: BASE.to_string(),
    }
}

pub fn exporter(fake: &Arc<FakeStatInk>) -> StatInkExporter {
    StatInkExporter::new(&config(), Arc::clone(fake) as Arc<dyn Transport>).unwrap()
}

pub fn session(json: &str) -> Session {
    serde_json::from_str(json).unwrap()
}
