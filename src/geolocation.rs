use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
const SELF_KEY: &str = "self";

#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("Impossible de déterminer la localisation")]
    Unavailable(String),
    #[error("Pays non détecté")]
    UnknownCountry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// The part of an ipapi.co answer we read.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    country_code: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Country lookup by IP through an ipapi.co compatible service, cached for an hour.
#[derive(Clone)]
pub struct GeoLocator {
    cache: Cache<String, Country>,
    base_url: String,
    client: reqwest::Client,
}

impl GeoLocator {
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(3600))
            .max_capacity(10_000)
            .build();

        Self {
            cache,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Resolve the country of `ip`. Private or missing addresses resolve the
    /// server's own public address instead.
    pub async fn lookup(&self, ip: Option<IpAddr>) -> Result<Country, GeoError> {
        let ip = ip.filter(is_public);
        let key = ip.map_or_else(|| SELF_KEY.to_string(), |ip| ip.to_string());

        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = match ip {
            Some(ip) => format!("{}/{ip}/json/", self.base_url),
            None => format!("{}/json/", self.base_url),
        };
        debug!("Looking up country at {url}");

        let response = self
            .client
            .get(&url)
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await
            .map_err(|e| GeoError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Unavailable(format!("HTTP {status}")));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Unavailable(e.to_string()))?;

        let country = country_from(body)?;
        self.cache.insert(key, country.clone()).await;
        Ok(country)
    }
}

fn country_from(body: IpApiResponse) -> Result<Country, GeoError> {
    if body.error {
        return Err(GeoError::Unavailable(body.reason.unwrap_or_default()));
    }

    let code = body
        .country_code
        .filter(|c| !c.trim().is_empty())
        .ok_or(GeoError::UnknownCountry)?;

    Ok(Country {
        name: body.country_name.unwrap_or_else(|| code.clone()),
        code: code.trim().to_uppercase(),
    })
}

/// Whether the address can be located; loopback and private ranges cannot.
fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    }
}

/// Parse the client address reported by `ConnectionInfo::realip_remote_addr`,
/// which may carry a port.
pub fn parse_client_ip(raw: &str) -> Option<IpAddr> {
    raw.parse::<IpAddr>().ok().or_else(|| {
        raw.parse::<std::net::SocketAddr>()
            .ok()
            .map(|addr| addr.ip())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> IpApiResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn reads_country_code_and_name() {
        let country = country_from(body(serde_json::json!({
            "ip": "90.12.1.1",
            "country_code": "fr",
            "country_name": "France",
        })))
        .unwrap();

        assert_eq!(
            country,
            Country {
                code: "FR".into(),
                name: "France".into()
            }
        );
    }

    #[test]
    fn api_error_and_missing_code_fail() {
        assert!(matches!(
            country_from(body(serde_json::json!({ "error": true, "reason": "RateLimited" }))),
            Err(GeoError::Unavailable(_))
        ));
        assert!(matches!(
            country_from(body(serde_json::json!({ "country_name": "Nowhere" }))),
            Err(GeoError::UnknownCountry)
        ));
    }

    #[test]
    fn client_ip_parses_with_or_without_port() {
        assert_eq!(parse_client_ip("203.0.113.7"), "203.0.113.7".parse().ok());
        assert_eq!(parse_client_ip("203.0.113.7:52100"), "203.0.113.7".parse().ok());
        assert_eq!(parse_client_ip("[2001:db8::1]:443"), "2001:db8::1".parse().ok());
        assert_eq!(parse_client_ip("unknown"), None);
    }

    #[test]
    fn private_addresses_are_not_located() {
        assert!(!is_public(&"127.0.0.1".parse().unwrap()));
        assert!(!is_public(&"192.168.1.20".parse().unwrap()));
        assert!(is_public(&"203.0.113.7".parse().unwrap()));
    }
}
