//! Blocking HTTP client for the catalog service.

use beryl_commerce::catalog::Package;
use beryl_commerce::gateway::{CatalogGateway, CouponLookup};
use beryl_commerce::promo::Coupon;
use beryl_commerce::CommerceError;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;

/// Error code the catalog sends for an unknown package.
const PACKAGE_NOT_FOUND: &str = "package_not_found";
/// Error code the catalog sends for a package not offered in a state.
const PACKAGE_NOT_AVAILABLE_IN_STATE: &str = "package_not_available_in_state";

/// Structured error body returned by the catalog service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Blocking client for the catalog service.
///
/// Every call blocks for at most the configured timeouts; a timeout yields
/// the same outcome as a connection failure. Nothing is retried here.
pub struct CatalogClient {
    http: Client,
    config: ClientConfig,
}

impl CatalogClient {
    /// Build a client from its configuration.
    pub fn new(config: ClientConfig) -> Result<Self, CommerceError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CommerceError::UnexpectedResponse(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// List every package the catalog offers.
    pub fn packages(&self) -> Result<Vec<Package>, CommerceError> {
        let url = self.url("/packages/index");
        debug!("GET {}", url);
        let response = self.http.get(&url).send().map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CommerceError::UnexpectedResponse(format!(
                "package index returned {}",
                status
            )));
        }
        response
            .json()
            .map_err(|e| CommerceError::UnexpectedResponse(e.to_string()))
    }

    /// Look up one package, optionally scoped to a state.
    pub fn package(&self, code: &str, state: Option<&str>) -> Result<Package, CommerceError> {
        let url = self.url(&format!("/packages/show/{}", code));
        debug!("GET {}", url);
        if state.is_none() {
            warn!("package lookup for {} without a state context", code);
        }

        let mut request = self.http.get(&url);
        if let Some(state) = state {
            request = request.query(&[("state", state)]);
        }
        let response = request.send().map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .map_err(|e| CommerceError::UnexpectedResponse(e.to_string()));
        }
        Err(package_error(code, state, status, response))
    }

    /// Look up a coupon scoped to a package and organization.
    ///
    /// Best-effort: transport problems and unexpected statuses come back as
    /// [`CouponLookup::Failed`], never as an error.
    pub fn coupon(
        &self,
        code: &str,
        package_code: &str,
        organization: Option<&str>,
    ) -> CouponLookup {
        let url = self.url(&format!("/coupons/show/{}", code));
        debug!("GET {}", url);

        let mut query: Vec<(&str, &str)> = vec![("product_key", package_code)];
        if let Some(org) = organization {
            query.push(("organization", org));
        }

        let response = match self.http.get(&url).query(&query).send() {
            Ok(response) => response,
            Err(e) => {
                warn!("coupon lookup for {} failed: {}", code, e);
                return CouponLookup::Failed(e.to_string());
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return CouponLookup::NotFound;
        }
        if !status.is_success() {
            warn!("coupon lookup for {} returned {}", code, status);
            return CouponLookup::Failed(format!("coupon lookup returned {}", status));
        }
        match response.json::<Coupon>() {
            Ok(coupon) => CouponLookup::Found(coupon),
            Err(e) => {
                warn!("coupon lookup for {} returned a malformed body: {}", code, e);
                CouponLookup::Failed(e.to_string())
            }
        }
    }
}

impl CatalogGateway for CatalogClient {
    fn resolve_package(&self, code: &str, state: Option<&str>) -> Result<Package, CommerceError> {
        self.package(code, state)
    }

    fn resolve_coupon(
        &self,
        code: &str,
        package_code: &str,
        organization: Option<&str>,
    ) -> CouponLookup {
        self.coupon(code, package_code, organization)
    }
}

fn transport_error(e: reqwest::Error) -> CommerceError {
    CommerceError::UnexpectedResponse(e.to_string())
}

/// Map a non-success package response onto the error taxonomy. The error
/// body's code field wins; a bare 404 also means "not found"; everything
/// else is unexpected.
fn package_error(
    code: &str,
    state: Option<&str>,
    status: StatusCode,
    response: Response,
) -> CommerceError {
    let body = response.text().unwrap_or_default();
    if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
        match err.error.as_str() {
            PACKAGE_NOT_FOUND => return CommerceError::PackageNotFound(code.to_string()),
            PACKAGE_NOT_AVAILABLE_IN_STATE => {
                return CommerceError::PackageNotAvailableInState {
                    code: code.to_string(),
                    state: state.unwrap_or_default().to_string(),
                }
            }
            _ => {}
        }
    }
    if status == StatusCode::NOT_FOUND {
        return CommerceError::PackageNotFound(code.to_string());
    }
    CommerceError::UnexpectedResponse(format!("package lookup returned {}", status))
}
