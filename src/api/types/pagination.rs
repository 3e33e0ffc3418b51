//! Lenient `?page=&size=` query parameters

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query as AxumQuery},
    http::request::Parts,
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::PageRequest;

/// Raw pagination parameters. Values that are missing, unparsable or not
/// positive fall back to the defaults instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl PageParams {
    pub fn to_page_request(&self) -> PageRequest {
        let parse = |value: &Option<String>| value.as_deref().and_then(|v| v.trim().parse().ok());
        PageRequest::new(parse(&self.page), parse(&self.size))
    }
}

/// Extracts a `PageRequest` from the query string. Never rejects: a query
/// string that cannot be read at all yields the default page.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub PageRequest);

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request = match AxumQuery::<PageParams>::from_request_parts(parts, state).await {
            Ok(AxumQuery(params)) => params.to_page_request(),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Ignoring malformed pagination query");
                PageRequest::default()
            }
        };

        Ok(Pagination(request))
    }
}
