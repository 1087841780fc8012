use super::GelfError;
use tracing::debug;

/// Resolve the `host` field of the record.
///
/// An explicit override wins; otherwise the machine hostname is used. Failing
/// to determine it is fatal and happens before any network activity.
pub fn resolve_host(override_host: Option<&str>) -> Result<String, GelfError> {
    if let Some(host) = override_host {
        debug!(host, "Using configured source host");
        return Ok(host.to_string());
    }

    let hostname = hostname::get()
        .map_err(|e| GelfError::Configuration(format!("Failed to resolve hostname: {e}")))?;

    let hostname = hostname.into_string().map_err(|raw| {
        GelfError::Configuration(format!("Hostname is not valid UTF-8: {raw:?}"))
    })?;

    debug!(host = %hostname, "Resolved local hostname");
    Ok(hostname)
}
