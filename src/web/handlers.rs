//! Route handlers — pure functions from a parsed request to a response.
//!
//! Handlers receive the service handle and ports directly; there is no
//! per-request state.  The server adapter's only jobs are to parse the
//! request line into `(method, uri, args)` and to write the returned
//! status/body back out, so everything behavioural is testable on the
//! host by calling [`dispatch`].

use log::info;

use super::{Method, QueryArgs, RouteId, RouteSet};
use crate::app::commands::AppCommand;
use crate::app::ports::{ConfigPort, EventSink, StoragePort};
use crate::app::service::AppService;
use crate::config::WifiCredentials;
use serde::Serialize;

// ───────────────────────────────────────────────────────────────
// Response
// ───────────────────────────────────────────────────────────────

/// Status code + body returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn json(body: String) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
        }
    }

    fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html",
            body: body.to_string(),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Status snapshot (read-only view for remote consumers)
// ───────────────────────────────────────────────────────────────

/// JSON shape of `GET /status`.
///
/// `heat_state` is the stable integer wire contract
/// (COOLING=0, ONTARGET=1, HEATING=2); `history` is oldest-first with
/// `null` marking missing samples.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub mode: &'static str,
    pub temperature_c: Option<f32>,
    pub setpoint_c: f32,
    pub hysteresis_c: f32,
    pub heat_state: u8,
    pub heat_state_label: &'static str,
    pub history: Vec<Option<f32>>,
}

impl StatusSnapshot {
    pub fn capture(service: &AppService) -> Self {
        let config = service.current_config();
        Self {
            mode: service.mode().as_str(),
            temperature_c: service.latest_sample(),
            setpoint_c: config.setpoint_c,
            hysteresis_c: config.hysteresis_c,
            heat_state: service.heat_state().code(),
            heat_state_label: service.heat_state().as_str(),
            history: service.history().read_ordered().collect(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Dispatch
// ───────────────────────────────────────────────────────────────

/// Resolve a request against the installed route set and run its handler.
/// A URI outside the set — including one from the *other* set — is a 404.
pub fn dispatch(
    set: RouteSet,
    method: Method,
    uri: &str,
    args_raw: &str,
    service: &mut AppService,
    storage: &mut (impl StoragePort + ConfigPort),
    sink: &mut impl EventSink,
) -> Response {
    let Some(id) = super::resolve(set, method, uri) else {
        return Response::text(404, "not found");
    };

    let args = QueryArgs::new(args_raw);
    match id {
        RouteId::Status => get_status(service),
        RouteId::SetConfig => set_config(service, storage, sink, &args),
        RouteId::SetupPage => setup_page(),
        RouteId::SaveCredentials => save_credentials(service, storage, sink, &args),
    }
}

// ───────────────────────────────────────────────────────────────
// Normal-mode handlers
// ───────────────────────────────────────────────────────────────

fn get_status(service: &AppService) -> Response {
    match serde_json::to_string(&StatusSnapshot::capture(service)) {
        Ok(body) => Response::json(body),
        Err(_) => Response::text(500, "serialisation failed"),
    }
}

fn set_config(
    service: &mut AppService,
    storage: &mut (impl StoragePort + ConfigPort),
    sink: &mut impl EventSink,
    args: &QueryArgs<'_>,
) -> Response {
    let setpoint = args.get("setpoint");
    let hysteresis = args.get("hysteresis");
    if setpoint.is_none() && hysteresis.is_none() {
        return Response::text(400, "expected setpoint and/or hysteresis");
    }

    if let Some(raw) = setpoint {
        match raw.parse::<f32>() {
            Ok(v) if v.is_finite() => {
                service.handle_command(AppCommand::SetSetpoint(v), storage, sink);
            }
            _ => return Response::text(400, "setpoint unparsable"),
        }
    }

    if let Some(raw) = hysteresis {
        match raw.parse::<f32>() {
            // The floor clamp happens inside the config setter.
            Ok(v) if v.is_finite() => {
                service.handle_command(AppCommand::SetHysteresis(v), storage, sink);
            }
            _ => return Response::text(400, "hysteresis unparsable"),
        }
    }

    let config = service.current_config();
    Response::json(format!(
        "{{\"setpoint_c\":{:.2},\"hysteresis_c\":{:.2}}}",
        config.setpoint_c, config.hysteresis_c
    ))
}

// ───────────────────────────────────────────────────────────────
// Provisioning-mode handlers
// ───────────────────────────────────────────────────────────────

/// Minimal setup form.  Markup is deliberately bare — the page only has
/// to work in a captive-portal browser.
const SETUP_PAGE: &str = "<!DOCTYPE html><html><head><title>HomeStat setup</title></head>\
<body><h1>HomeStat Wi-Fi setup</h1>\
<form method=\"post\" action=\"/save\">\
SSID: <input name=\"ssid\" maxlength=\"32\"><br>\
Password: <input name=\"password\" type=\"password\" maxlength=\"64\"><br>\
<input type=\"submit\" value=\"Save and restart\">\
</form></body></html>";

fn setup_page() -> Response {
    Response::html(SETUP_PAGE)
}

fn save_credentials(
    service: &mut AppService,
    storage: &mut (impl StoragePort + ConfigPort),
    sink: &mut impl EventSink,
    args: &QueryArgs<'_>,
) -> Response {
    let Some(ssid) = args.get("ssid") else {
        return Response::text(400, "ssid missing");
    };
    let password = args.get("password").unwrap_or_default();

    match WifiCredentials::validated(&ssid, &password) {
        Ok(creds) => {
            info!("provisioning: credentials received for '{}'", creds.ssid);
            service.handle_command(AppCommand::SaveCredentials(creds), storage, sink);
            if service.restart_pending() {
                Response::text(200, "saved, restarting")
            } else {
                Response::text(500, "credential store failed")
            }
        }
        Err(e) => {
            log::warn!("provisioning: rejected credentials — {}", e);
            Response::text(400, "invalid credentials")
        }
    }
}
