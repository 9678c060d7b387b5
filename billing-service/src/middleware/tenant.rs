//! Vendor context extractor for multi-tenancy.
//!
//! Every entity in the system is scoped by vendor; nothing is shared across
//! tenants. The auth gateway authenticates the user, resolves their vendor
//! membership, and forwards it in headers. This subsystem trusts those
//! headers; role gating itself is the gateway's concern.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;

/// Tenant scope extracted from request headers.
#[derive(Debug, Clone)]
pub struct VendorContext {
    /// Vendor (tenant) every query in the request is scoped to.
    pub vendor_id: String,
    /// Acting user, when the gateway forwards one.
    pub user_id: Option<String>,
}

impl VendorContext {
    pub fn new(vendor_id: String, user_id: Option<String>) -> Self {
        Self { vendor_id, user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for VendorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let vendor_id = parts
            .headers
            .get("X-Vendor-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::AuthError(anyhow::anyhow!(
                    "Missing X-Vendor-ID header (required from gateway)"
                ))
            })?;

        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let span = tracing::Span::current();
        span.record("vendor_id", vendor_id);
        if let Some(ref uid) = user_id {
            span.record("user_id", uid.as_str());
        }

        Ok(VendorContext::new(vendor_id.to_string(), user_id))
    }
}
