//! Mode-gated web route tables and request parsing.
//!
//! The two route sets are data, not behaviour: each is a static table of
//! `(method, uri, handler id)` rows, and [`handlers::dispatch`] resolves a
//! request against whichever table is installed.  The mode controller
//! guarantees exactly one set is active at a time, so a provisioning
//! device never serves `/status` and a normal device never serves the
//! credential-save route.
//!
//! The HTTP transport itself (socket accept, header parsing, markup
//! payloads) is a thin shim in the server adapter; everything in this
//! module is pure and host-testable.

pub mod handlers;

// ───────────────────────────────────────────────────────────────
// Route tables
// ───────────────────────────────────────────────────────────────

/// The two mutually exclusive route sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSet {
    /// `GET /` setup form, `POST /save` credentials.
    Provisioning,
    /// `GET /status` snapshot, `POST /set` config updates.
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Handler identity — resolved to a function by [`handlers::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteId {
    Status,
    SetConfig,
    SetupPage,
    SaveCredentials,
}

/// One row of a route table.
pub struct RouteSpec {
    pub method: Method,
    pub uri: &'static str,
    pub id: RouteId,
}

static NORMAL_ROUTES: [RouteSpec; 2] = [
    RouteSpec {
        method: Method::Get,
        uri: "/status",
        id: RouteId::Status,
    },
    RouteSpec {
        method: Method::Post,
        uri: "/set",
        id: RouteId::SetConfig,
    },
];

static PROVISIONING_ROUTES: [RouteSpec; 2] = [
    RouteSpec {
        method: Method::Get,
        uri: "/",
        id: RouteId::SetupPage,
    },
    RouteSpec {
        method: Method::Post,
        uri: "/save",
        id: RouteId::SaveCredentials,
    },
];

/// The route table for a set.
pub fn routes(set: RouteSet) -> &'static [RouteSpec] {
    match set {
        RouteSet::Normal => &NORMAL_ROUTES,
        RouteSet::Provisioning => &PROVISIONING_ROUTES,
    }
}

/// Resolve `(method, uri)` against a set's table.
pub fn resolve(set: RouteSet, method: Method, uri: &str) -> Option<RouteId> {
    routes(set)
        .iter()
        .find(|r| r.method == method && r.uri == uri)
        .map(|r| r.id)
}

// ───────────────────────────────────────────────────────────────
// Query / form argument parsing
// ───────────────────────────────────────────────────────────────

/// Borrowed view over an `application/x-www-form-urlencoded` argument
/// string (`a=1&b=two+words`).  Values are percent-decoded on access.
pub struct QueryArgs<'a> {
    raw: &'a str,
}

impl<'a> QueryArgs<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Decoded value for `key`, or `None` if absent or malformed.
    pub fn get(&self, key: &str) -> Option<heapless::String<64>> {
        self.raw
            .split('&')
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| decode_component(v))
    }

    /// Decoded value parsed as `f32`.
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key)?.parse().ok()
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-decode one component (`+` means space).  Rejects truncated or
/// non-hex escapes and anything longer than 64 decoded bytes.
fn decode_component(s: &str) -> Option<heapless::String<64>> {
    let bytes = s.as_bytes();
    let mut decoded: heapless::Vec<u8, 64> = heapless::Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = match bytes[i] {
            b'+' => b' ',
            b'%' => {
                let hi = hex_nibble(*bytes.get(i + 1)?)?;
                let lo = hex_nibble(*bytes.get(i + 2)?)?;
                i += 2;
                (hi << 4) | lo
            }
            other => other,
        };
        decoded.push(b).ok()?;
        i += 1;
    }
    let text = core::str::from_utf8(&decoded).ok()?;
    let mut out = heapless::String::new();
    out.push_str(text).ok()?;
    Some(out)
}
