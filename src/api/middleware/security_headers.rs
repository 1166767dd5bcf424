//! Browser hardening headers added to every response.

use axum::Router;
use axum::http::header::{self, HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// `Content-Security-Policy` value: same-origin by default, plus the CDNs the
/// pages may load assets from and the identity backend.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://unpkg.com https://cdnjs.cloudflare.com; \
style-src 'self' 'unsafe-inline' https://fonts.googleapis.com https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; \
font-src 'self' https://fonts.gstatic.com https://cdn.jsdelivr.net data:; \
img-src 'self' data: https://images.unsplash.com https://*.cloudinary.com https://cdn.jsdelivr.net; \
connect-src 'self' https://*.supabase.co wss://*.supabase.co;";

/// Headers and values set on every response, overriding handler values.
pub fn headers() -> [(HeaderName, HeaderValue); 6] {
    [
        (
            HeaderName::from_static("x-dns-prefetch-control"),
            HeaderValue::from_static("on"),
        ),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ),
    ]
}

/// Layers the security headers onto a router.
///
/// # Example
///
/// ```rust,ignore
/// let app = security_headers::apply(Router::new().route("/", get(home)));
/// ```
pub fn apply<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    headers().into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::overriding(name, value))
    })
}
