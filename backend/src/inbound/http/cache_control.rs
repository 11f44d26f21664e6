//! `Cache-Control` for responses that carry per-user care data.
//!
//! Overviews, capabilities, guest sessions and admin listings may sit in a
//! client-side cache, but only if it revalidates before each reuse.

use actix_web::http::header::{CacheControl, CacheDirective};

/// `private, no-cache, must-revalidate`.
pub fn private_no_cache_header() -> CacheControl {
    CacheControl(vec![
        CacheDirective::Private,
        CacheDirective::NoCache,
        CacheDirective::MustRevalidate,
    ])
}
