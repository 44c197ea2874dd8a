//! OAPEN resource-id extraction from catalog URLs.

/// Marker substring every OAPEN catalog URL carries in its host.
pub const OAPEN_HOST: &str = "oapen.org";

/// Query parameter that carries the resource id.
const DOCID_PARAM: &str = "docid";

/// Error type for resource-id extraction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OapenError {
    /// Caller contract: the URL must point at the OAPEN catalog.
    #[error("not an OAPEN catalog URL: {0}")]
    NotOapen(String),

    /// Caller contract: the URL must use an http scheme.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The catalog URL carries no docid query parameter.
    #[error("no docid parameter in {0}")]
    MissingDocid(String),
}

/// Extract the OAPEN resource id from a catalog URL.
///
/// The URL must parse, use an http(s) scheme, and have a host containing
/// the OAPEN marker; violating either check is a caller-contract error,
/// not a condition to recover from. Returns the first `docid` query value
/// with standard query percent-decoding applied; repeated parameters
/// beyond the first are ignored.
pub fn resource_id(input: &str) -> Result<String, OapenError> {
    let parsed = url::Url::parse(input).map_err(|e| OapenError::InvalidUrl(e.to_string()))?;

    if !parsed.scheme().contains("http") {
        return Err(OapenError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    match parsed.host_str() {
        Some(host) if host.contains(OAPEN_HOST) => {}
        _ => return Err(OapenError::NotOapen(input.to_string())),
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == DOCID_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| OapenError::MissingDocid(input.to_string()))
}
