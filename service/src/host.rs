use std::net::IpAddr;

use crate::error::AppError;

/// Who answered a request: the machine hostname and the address it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub hostname: String,
    pub address: IpAddr,
}

/// Where handlers get the host identity from.
#[derive(Debug, Clone)]
pub enum HostSource {
    /// Look up the hostname and resolve it on every request, so a rescheduled pod reports its
    /// new address.
    System,
    /// A fixed identity, for tests and for hosts whose name does not resolve.
    Static(HostIdentity),
}

impl HostSource {
    pub async fn identify(&self) -> Result<HostIdentity, AppError> {
        match self {
            HostSource::System => {
                let hostname = hostname::get()
                    .map_err(AppError::Hostname)?
                    .to_string_lossy()
                    .into_owned();
                resolve(hostname).await
            }
            HostSource::Static(identity) => Ok(identity.clone()),
        }
    }
}

async fn resolve(hostname: String) -> Result<HostIdentity, AppError> {
    let lookup = tokio::net::lookup_host((hostname.clone(), 0)).await;
    let addrs = match lookup {
        Ok(addrs) => addrs,
        Err(source) => return Err(AppError::Resolve { hostname, source }),
    };

    match first_address(addrs.map(|addr| addr.ip())) {
        Some(address) => Ok(HostIdentity { hostname, address }),
        None => Err(AppError::NoAddress(hostname)),
    }
}

/// First IPv4 address, falling back to the first address of any family.
fn first_address(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut fallback = None;
    for addr in addrs {
        if addr.is_ipv4() {
            return Some(addr);
        }
        fallback.get_or_insert(addr);
    }
    fallback
}
