//! HTTP server adapter.
//!
//! Implements [`ServerPort`] over a polled request queue: incoming
//! requests are enqueued (by the transport on device, by tests on the
//! host), and the service loop drains them through
//! [`web::handlers::dispatch`](crate::web::handlers::dispatch) each
//! iteration.  That keeps every handler on the single service thread —
//! the domain never needs a lock.
//!
//! ## espidf transport
//!
//! The socket front-end is `esp_idf_svc::http::server::EspHttpServer`
//! with one registered URI per [`RouteSpec`](crate::web::RouteSpec) row;
//! each callback parses the request line and form body into an
//! [`IncomingRequest`], enqueues it, and waits on the paired response
//! slot.  That wiring is threaded in from `main.rs` together with the
//! other peripheral handles; the adapter itself stays transport-agnostic
//! so hosts exercise the identical dispatch path.

use std::collections::VecDeque;

use log::info;

use crate::app::ports::{ConfigPort, EventSink, ServerPort, StoragePort};
use crate::app::service::AppService;
use crate::web::handlers::{self, Response};
use crate::web::{Method, RouteSet, routes};

/// One parsed request waiting for dispatch.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub uri: heapless::String<64>,
    /// Raw query / form argument string.
    pub args: heapless::String<128>,
}

pub struct HttpServerAdapter {
    active: Option<RouteSet>,
    queue: VecDeque<IncomingRequest>,
    /// Most recent handler response, kept for test assertions.
    last_response: Option<Response>,
}

impl Default for HttpServerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpServerAdapter {
    pub fn new() -> Self {
        Self {
            active: None,
            queue: VecDeque::new(),
            last_response: None,
        }
    }

    /// Enqueue a request for the next `poll`.  Returns `false` (request
    /// refused) while no route set is installed.
    pub fn enqueue(&mut self, method: Method, uri: &str, args: &str) -> bool {
        if self.active.is_none() {
            return false;
        }
        let mut req = IncomingRequest {
            method,
            uri: heapless::String::new(),
            args: heapless::String::new(),
        };
        if req.uri.push_str(uri).is_err() || req.args.push_str(args).is_err() {
            return false;
        }
        self.queue.push_back(req);
        true
    }

    /// Drain all pending requests through the route dispatcher.
    /// Called once per service-loop iteration.
    pub fn poll(
        &mut self,
        service: &mut AppService,
        storage: &mut (impl StoragePort + ConfigPort),
        sink: &mut impl EventSink,
    ) {
        while let Some(req) = self.queue.pop_front() {
            let Some(set) = self.active else {
                // Route set torn down between enqueue and poll.
                break;
            };
            let response =
                handlers::dispatch(set, req.method, &req.uri, &req.args, service, storage, sink);
            info!("http: {:?} {} -> {}", req.method, req.uri, response.status);
            self.last_response = Some(response);
        }
    }

    /// The response produced by the most recent dispatched request.
    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }
}

impl ServerPort for HttpServerAdapter {
    fn install_routes(&mut self, set: RouteSet) {
        self.active = Some(set);
        for r in routes(set) {
            info!("http: route registered {:?} {}", r.method, r.uri);
        }
    }

    fn teardown(&mut self) {
        if self.active.take().is_some() {
            self.queue.clear();
            info!("http: route table torn down");
        }
    }

    fn active_set(&self) -> Option<RouteSet> {
        self.active
    }
}
