//! Keep-alive connection pool owned by a single service.

use std::fmt::{self, Display};
use std::time::Duration;

use reqwest::Client;
use url::Url;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::options::RequestOptions;
use super::service::ResponseHandle;

/// Maximum idle connections kept per host.
pub const MAX_FREE_SOCKETS: usize = 16;

/// Interval between TCP keep-alive probes on pooled sockets.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_millis(1000);

const ENCRYPTED_PREFIX: &str = "https:";

/// Transport a pool is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Plain,
    Encrypted,
}

impl Transport {
    /// Picks the transport for a root URL.
    ///
    /// Only a literal, case-sensitive `https:` prefix selects
    /// [`Transport::Encrypted`]; anything else, malformed input included,
    /// falls back to [`Transport::Plain`].
    pub fn for_root_url(root_url: &str) -> Self {
        if root_url.starts_with(ENCRYPTED_PREFIX) {
            Transport::Encrypted
        } else {
            Transport::Plain
        }
    }

    /// URL scheme this transport carries.
    pub fn scheme(&self) -> &'static str {
        match self {
            Transport::Plain => "http",
            Transport::Encrypted => "https",
        }
    }
}

impl Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Plain => write!(f, "plain"),
            Transport::Encrypted => write!(f, "encrypted"),
        }
    }
}

/// A keep-alive connection pool for one transport.
///
/// Cloning is cheap and shares the same sockets; the sockets are released
/// once the last clone is dropped.
#[derive(Debug, Clone)]
pub struct ConnectionPool {
    id: Uuid,
    transport: Transport,
    client: Client,
}

impl ConnectionPool {
    pub fn new(transport: Transport, user_agent: &str) -> ServiceResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(MAX_FREE_SOCKETS)
            .tcp_keepalive(KEEP_ALIVE_INTERVAL)
            .https_only(transport == Transport::Encrypted)
            .user_agent(user_agent)
            .build()
            .map_err(ServiceError::PoolCreation)?;

        Ok(Self {
            id: Uuid::new_v4(),
            transport,
            client,
        })
    }

    /// Identifies this pool; every handle it prepares carries the same id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Assembles a request bound to this pool without sending it.
    pub(crate) fn prepare(&self, url: Url, options: RequestOptions) -> ServiceResult<ResponseHandle> {
        if url.scheme() != self.transport.scheme() {
            return Err(ServiceError::UnsupportedProtocol {
                transport: self.transport,
                scheme: url.scheme().to_string(),
            });
        }

        let method = options.effective_method();
        let mut builder = self.client.request(method, url).headers(options.headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let request = builder.build().map_err(ServiceError::InvalidRequest)?;

        Ok(ResponseHandle::new(self.id, self.client.clone(), request))
    }
}
