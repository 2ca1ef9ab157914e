//! Page handlers
//!
//! `view`, `edit` and `save` run after the router has validated the title.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::error::WikiError;
use crate::http;
use crate::logger;
use crate::page::Page;
use crate::routing::PageAction;
use crate::template::{EDIT_TEMPLATE, VIEW_TEMPLATE};

/// Render a page, or send the client to its edit form if it does not exist
pub async fn view(state: &AppState, title: &str, is_head: bool) -> Response<Full<Bytes>> {
    match load_page(state, title).await {
        Some(page) => render(state, VIEW_TEMPLATE, &page, is_head),
        None => http::build_redirect_response(&PageAction::Edit.path_for(title)),
    }
}

/// Render the edit form for an existing page or a blank one
pub async fn edit(state: &AppState, title: &str, is_head: bool) -> Response<Full<Bytes>> {
    let page = load_page(state, title)
        .await
        .unwrap_or_else(|| Page::empty(title));
    render(state, EDIT_TEMPLATE, &page, is_head)
}

/// Persist submitted content, then redirect to the page view
pub async fn save(state: &AppState, title: &str, body: Vec<u8>) -> Response<Full<Bytes>> {
    let page = Page::new(title, body);

    match state.store.save(&page).await {
        Ok(()) => {
            logger::log_page_saved(&page.title, page.body.len());
            http::build_redirect_response(&PageAction::View.path_for(title))
        }
        Err(e) => {
            logger::log_error(&format!("Failed to save page '{title}': {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}

/// Load a page, treating any read failure as a missing page
async fn load_page(state: &AppState, title: &str) -> Option<Page> {
    match state.store.load(title).await {
        Ok(page) => Some(page),
        Err(WikiError::NotFound(_)) => None,
        Err(e) => {
            logger::log_warning(&format!("Failed to load page '{title}': {e}"));
            None
        }
    }
}

fn render(state: &AppState, template: &str, page: &Page, is_head: bool) -> Response<Full<Bytes>> {
    match state.templates.render(template, page) {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render '{}': {e}", page.title));
            http::build_500_response(&e.to_string())
        }
    }
}
