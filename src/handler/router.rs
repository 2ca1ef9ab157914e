//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for body-size checks,
//! route matching, path validation, and dispatching to the page handlers.

use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::handler::wiki;
use crate::http::{self, FormData};
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, PageAction, PagePath};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let access_entry = state.config.logging.access_log.then(|| {
        AccessLogEntry::from_request(
            peer_addr,
            &parts.method,
            &parts.uri,
            parts.version,
            &parts.headers,
        )
    });

    let mut response = match check_body_size(&parts, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => route_request(&parts, body, &state).await,
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = access_entry {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.finish(
            response.status().as_u16(),
            usize::try_from(body_bytes).unwrap_or(usize::MAX),
            started,
        );
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(parts: &Parts, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = parts.headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path
async fn route_request<B>(parts: &Parts, body: B, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let Some(path) = http::decode_path(parts.uri.path()) else {
        logger::log_debug(&format!("Undecodable path: {}", parts.uri.path()));
        return http::build_404_response();
    };
    let path = path.as_ref();
    let routes = &state.config.routes;

    if path == "/" {
        return http::build_redirect_response(&PageAction::View.path_for(&routes.front_page));
    }

    if routes.health.enabled && path == routes.health.liveness_path {
        return http::build_health_response("ok");
    }

    if routing::match_route(path).is_none() {
        return http::build_404_response();
    }

    // Every page route is wrapped by the path validator
    let page_path = match state.validator.match_path(path) {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&e.to_string());
            return http::build_404_response();
        }
    };

    dispatch_page_handler(parts, body, page_path, state).await
}

/// Dispatch a validated page path to its handler
async fn dispatch_page_handler<B>(
    parts: &Parts,
    body: B,
    page_path: PagePath<'_>,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let is_head = parts.method == Method::HEAD;
    let PagePath { action, title } = page_path;

    match action {
        PageAction::View => wiki::view(state, title, is_head).await,
        PageAction::Edit => wiki::edit(state, title, is_head).await,
        PageAction::Save => {
            let query = FormData::parse(parts.uri.query().unwrap_or_default().as_bytes());
            match read_form_body(parts, body, state.config.http.max_body_size).await {
                Ok(form) => {
                    let content = http::form_value(&form, &query, "body");
                    wiki::save(state, title, content).await
                }
                Err(resp) => resp,
            }
        }
    }
}

/// Read url-encoded form fields from the request body
///
/// Bodies of any other content type are left unread.
async fn read_form_body<B>(
    parts: &Parts,
    body: B,
    max_body_size: u64,
) -> Result<FormData, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let is_form = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(http::is_form_content_type);
    if !is_form {
        return Ok(FormData::default());
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(FormData::parse(&collected.to_bytes())),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body exceeds {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            Err(http::build_500_response(&e.to_string()))
        }
    }
}
