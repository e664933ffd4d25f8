//! gRPC client for the file service.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Response, Status};

use fileserve::{FileContent, FileMetadata};

use crate::interceptor;
use crate::method;
use crate::proto::{
    FileContentRequest, FileInfoRequest, ListFilesRequest, file_service_client::FileServiceClient,
};

/// Default deadline applied to every call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on establishing the transport connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Deadline for each call, measured from when it is issued
    pub call_timeout: Duration,
    /// Bound on the initial connection attempt
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Set the per-call deadline.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Errors returned by [`FileClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server address could not be parsed
    #[error("invalid server address {address}: {source}")]
    InvalidAddress {
        /// Address as given
        address: String,
        /// Parse error
        #[source]
        source: tonic::transport::Error,
    },

    /// The connection could not be established
    #[error("failed to connect to {address}: {source}")]
    Connection {
        /// Address as given
        address: String,
        /// Transport error
        #[source]
        source: tonic::transport::Error,
    },

    /// The client was closed before the call
    #[error("client is closed")]
    Closed,

    /// No response arrived before the call's deadline
    #[error("{method} timed out after {timeout:?}")]
    DeadlineExceeded {
        /// Method that timed out
        method: &'static str,
        /// Deadline that elapsed
        timeout: Duration,
    },

    /// The server answered with an error status
    #[error("{}", .0.message())]
    Status(#[from] Status),
}

impl ClientError {
    /// The server-reported status code, if this error came from the server.
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Status(status) => Some(status.code()),
            _ => None,
        }
    }

    /// Human readable message; the server's own message for status errors.
    pub fn message(&self) -> String {
        match self {
            Self::Status(status) => status.message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Client for a fileserve gRPC server.
///
/// Holds one connection for its whole life. Calls take `&self` and may run
/// concurrently; [`close`](Self::close) releases the connection.
#[derive(Debug)]
pub struct FileClient {
    inner: Option<FileServiceClient<Channel>>,
    config: ClientConfig,
}

impl FileClient {
    /// Connect to `address` (`host:port`, optionally with an `http://` scheme).
    pub async fn connect(
        address: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let address = address.into();
        let uri = if address.contains("://") {
            address.clone()
        } else {
            format!("http://{}", address)
        };

        let endpoint = match Endpoint::from_shared(uri) {
            Ok(endpoint) => endpoint.connect_timeout(config.connect_timeout),
            Err(source) => return Err(ClientError::InvalidAddress { address, source }),
        };

        tracing::debug!("Connecting to {}", address);
        let channel = endpoint
            .connect()
            .await
            .map_err(|source| ClientError::Connection {
                address: address.clone(),
                source,
            })?;
        tracing::debug!("Connected to {}", address);

        Ok(Self::from_channel(channel, config))
    }

    /// Wrap an already established channel.
    pub fn from_channel(channel: Channel, config: ClientConfig) -> Self {
        Self {
            inner: Some(FileServiceClient::new(channel)),
            config,
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Release the connection. Later calls fail with [`ClientError::Closed`].
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("Client connection closed");
        }
    }

    /// List all files on the server.
    pub async fn list_files(&self) -> Result<Vec<String>, ClientError> {
        let mut client = self.client()?;
        let response = self
            .call(method::LIST_FILES, async move {
                client.list_files(ListFilesRequest {}).await
            })
            .await?;
        Ok(response.files)
    }

    /// Fetch metadata for `filename`.
    pub async fn file_info(&self, filename: &str) -> Result<FileMetadata, ClientError> {
        let mut client = self.client()?;
        let request = FileInfoRequest {
            filename: filename.to_string(),
        };
        let response = self
            .call(method::GET_FILE_INFO, async move {
                client.get_file_info(request).await
            })
            .await?;
        Ok(FileMetadata::new(response.filename, response.size))
    }

    /// Fetch the content of `filename`.
    pub async fn file_content(&self, filename: &str) -> Result<FileContent, ClientError> {
        let mut client = self.client()?;
        let request = FileContentRequest {
            filename: filename.to_string(),
        };
        let response = self
            .call(method::GET_FILE_CONTENT, async move {
                client.get_file_content(request).await
            })
            .await?;
        Ok(FileContent::new(response.filename, response.content))
    }

    fn client(&self) -> Result<FileServiceClient<Channel>, ClientError> {
        self.inner.clone().ok_or(ClientError::Closed)
    }

    /// Run one call under the client logging stage and the call deadline.
    async fn call<T, Fut>(&self, method: &'static str, call: Fut) -> Result<T, ClientError>
    where
        Fut: Future<Output = Result<Response<T>, Status>>,
    {
        let timeout = self.config.call_timeout;
        interceptor::client_logging(method, async move {
            match tokio::time::timeout(timeout, call).await {
                Ok(Ok(response)) => Ok(response.into_inner()),
                Ok(Err(status)) => Err(ClientError::Status(status)),
                Err(_) => Err(ClientError::DeadlineExceeded { method, timeout }),
            }
        })
        .await
    }
}
