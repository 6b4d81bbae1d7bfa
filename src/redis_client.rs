use redis::aio::ConnectionManager;
use redis::{ConnectionInfo, IntoConnectionInfo, RedisResult};

use crate::error::ConnectError;
use crate::metrics::collector::{InfoSection, InfoSource};

/// Accepts either a bare `host:port` or a full `redis://` / `rediss://`
/// URL. Bare addresses select database 0.
pub fn connection_url(addr: &str) -> String {
    if addr.starts_with("redis://") || addr.starts_with("rediss://") {
        addr.to_owned()
    } else {
        format!("redis://{addr}/0")
    }
}

/// Resolves the configured address and secret into connection info.
/// An empty password means the server has no `requirepass`.
pub fn connection_info(addr: &str, password: &str) -> Result<ConnectionInfo, ConnectError> {
    let mut info = connection_url(addr)
        .into_connection_info()
        .map_err(|source| ConnectError::InvalidAddress {
            addr: addr.to_owned(),
            source,
        })?;

    if !password.is_empty() {
        info.redis.password = Some(password.to_owned());
    }

    Ok(info)
}

/// Opens a `ConnectionManager` that auto-reconnects on failure.
///
/// The first connection attempt happens here, so an unreachable server
/// is reported at startup rather than on the first poll.
pub async fn connect(addr: &str, password: &str) -> Result<ConnectionManager, ConnectError> {
    let info = connection_info(addr, password)?;
    let client = redis::Client::open(info).map_err(|source| ConnectError::InvalidAddress {
        addr: addr.to_owned(),
        source,
    })?;

    ConnectionManager::new(client)
        .await
        .map_err(|source| ConnectError::Unreachable {
            addr: addr.to_owned(),
            source,
        })
}

impl InfoSource for ConnectionManager {
    async fn info(&mut self, section: InfoSection) -> RedisResult<String> {
        redis::cmd("INFO").arg(section.as_str()).query_async(self).await
    }
}
