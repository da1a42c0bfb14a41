//! This modules defines the common functionality for paging data.

use axum::http::{HeaderMap, Uri, header::HOST};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The number of records to skip when not specified in a request.
    pub default_skip: u64,
    /// The maximum number of records per page when not specified in a request.
    pub default_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_skip: 0,
            default_limit: 100,
        }
    }
}

/// One page of a filtered result set plus links to the neighbouring pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The number of records matching the filters, ignoring `skip` and `limit`.
    pub total: u64,
    /// The number of matching records skipped before this page.
    pub skip: u64,
    /// The maximum number of records on this page.
    pub limit: u64,
    /// A link to the following page, present iff `skip + limit < total`.
    pub next: Option<String>,
    /// A link to the preceding page, present iff `skip > 0`.
    pub prev: Option<String>,
    /// The records on this page.
    pub items: Vec<T>,
}

/// The `skip` for the page after the one starting at `skip`, if there is one.
pub fn next_skip(skip: u64, limit: u64, total: u64) -> Option<u64> {
    let next = skip.saturating_add(limit);

    (next < total).then_some(next)
}

/// The `skip` for the page before the one starting at `skip`, if there is one.
///
/// Clamped to zero, so the link from a page smaller than `limit` points at the first page.
pub fn prev_skip(skip: u64, limit: u64) -> Option<u64> {
    (skip > 0).then(|| skip.saturating_sub(limit))
}

#[derive(Serialize)]
struct PageParams {
    skip: u64,
    limit: u64,
}

/// Build a link to the page starting at `skip`.
///
/// The query string reproduces every field of `filters` that is set, in
/// declaration order, followed by `skip` and `limit`.
///
/// # Errors
/// Returns [Error::LinkEncodingError] if `filters` cannot be encoded as a query string.
pub fn build_link<F: Serialize>(
    base_url: &str,
    filters: &F,
    skip: u64,
    limit: u64,
) -> Result<String, Error> {
    let encode = |error: serde_urlencoded::ser::Error| Error::LinkEncodingError(error.to_string());

    let filter_query = serde_urlencoded::to_string(filters).map_err(encode)?;
    let page_query = serde_urlencoded::to_string(PageParams { skip, limit }).map_err(encode)?;

    if filter_query.is_empty() {
        Ok(format!("{base_url}?{page_query}"))
    } else {
        Ok(format!("{base_url}?{filter_query}&{page_query}"))
    }
}

impl<T> Page<T> {
    /// Assemble a page and its navigation links.
    ///
    /// `items` should already be limited to at most `limit` records starting at `skip`.
    ///
    /// # Errors
    /// Returns [Error::LinkEncodingError] if the links cannot be encoded.
    pub fn new<F: Serialize>(
        items: Vec<T>,
        total: u64,
        skip: u64,
        limit: u64,
        base_url: &str,
        filters: &F,
    ) -> Result<Self, Error> {
        let next = next_skip(skip, limit, total)
            .map(|next| build_link(base_url, filters, next, limit))
            .transpose()?;
        let prev = prev_skip(skip, limit)
            .map(|prev| build_link(base_url, filters, prev, limit))
            .transpose()?;

        Ok(Self {
            total,
            skip,
            limit,
            next,
            prev,
            items,
        })
    }
}

/// The URL of a request without its query string, used as the prefix for navigation links.
///
/// Uses the scheme and authority of an absolute request URI when there is one,
/// otherwise the `Host` header (with the scheme from `X-Forwarded-Proto`,
/// defaulting to http). Falls back to just the path when neither is available.
pub fn request_base_url(uri: &Uri, headers: &HeaderMap) -> String {
    let path = uri.path();

    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return format!("{scheme}://{authority}{path}");
    }

    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
    };

    match header_str(HOST.as_str()) {
        Some(host) => {
            let scheme = header_str("x-forwarded-proto").unwrap_or("http");
            format!("{scheme}://{host}{path}")
        }
        None => path.to_owned(),
    }
}
