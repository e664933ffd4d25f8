//! gRPC server implementation for the file service.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use fileserve::{FileUsecase, RepositoryError};

use crate::interceptor;
use crate::method;
use crate::proto::{
    self, FileContentRequest, FileContentResponse, FileInfoRequest, FileInfoResponse,
    ListFilesRequest, ListFilesResponse,
};

/// The FileService gRPC service implementation.
///
/// Handlers are stateless; everything they touch goes through the
/// [`FileUsecase`].
#[derive(Clone, Debug)]
pub struct FileService {
    usecase: FileUsecase,
}

impl FileService {
    /// Create a new file service.
    pub fn new(usecase: FileUsecase) -> Self {
        Self { usecase }
    }

    async fn handle_list_files(
        &self,
        _request: ListFilesRequest,
    ) -> Result<ListFilesResponse, Status> {
        let files = self
            .usecase
            .list_files()
            .await
            .map_err(|e| Status::internal(format!("Error getting file list: {}", e)))?;
        Ok(ListFilesResponse { files })
    }

    async fn handle_file_info(
        &self,
        request: FileInfoRequest,
    ) -> Result<FileInfoResponse, Status> {
        let metadata = self
            .usecase
            .file_info(&request.filename)
            .await
            .map_err(|e| to_status("Error getting file metadata", e))?;
        Ok(FileInfoResponse {
            filename: request.filename,
            size: metadata.size,
        })
    }

    async fn handle_file_content(
        &self,
        request: FileContentRequest,
    ) -> Result<FileContentResponse, Status> {
        let content = self
            .usecase
            .file_content(&request.filename)
            .await
            .map_err(|e| to_status("Error getting file content", e))?;
        Ok(FileContentResponse {
            filename: request.filename,
            content,
        })
    }
}

/// Map a repository failure to a gRPC status.
fn to_status(context: &str, err: RepositoryError) -> Status {
    let message = format!("{}: {}", context, err);
    if err.is_not_found() {
        Status::not_found(message)
    } else {
        Status::internal(message)
    }
}

#[tonic::async_trait]
impl proto::file_service_server::FileService for FileService {
    async fn list_files(
        &self,
        request: Request<ListFilesRequest>,
    ) -> Result<Response<ListFilesResponse>, Status> {
        interceptor::server_chain(method::LIST_FILES, request, |req| async move {
            self.handle_list_files(req.into_inner()).await.map(Response::new)
        })
        .await
    }

    async fn get_file_info(
        &self,
        request: Request<FileInfoRequest>,
    ) -> Result<Response<FileInfoResponse>, Status> {
        interceptor::server_chain(method::GET_FILE_INFO, request, |req| async move {
            self.handle_file_info(req.into_inner()).await.map(Response::new)
        })
        .await
    }

    async fn get_file_content(
        &self,
        request: Request<FileContentRequest>,
    ) -> Result<Response<FileContentResponse>, Status> {
        interceptor::server_chain(method::GET_FILE_CONTENT, request, |req| async move {
            self.handle_file_content(req.into_inner()).await.map(Response::new)
        })
        .await
    }
}

/// Lifecycle state of a [`FileServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Constructed, not yet serving
    Created,
    /// Listener bound and serving calls
    Running,
    /// Shut down; cannot be restarted
    Stopped,
}

/// Errors from starting or stopping a [`FileServer`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("failed to bind listener on {addr}: {source}")]
    Listener {
        /// Address the bind was attempted on
        addr: SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The operation is not valid in the server's current state
    #[error("cannot start server in state {0:?}")]
    InvalidState(ServerState),

    /// The serve loop exited with a transport error
    #[error("server error: {0}")]
    Serve(#[source] tonic::transport::Error),

    /// The serve task could not be joined
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

enum Lifecycle {
    Created,
    Running {
        local_addr: SocketAddr,
        shutdown_tx: oneshot::Sender<()>,
        handle: JoinHandle<Result<(), tonic::transport::Error>>,
    },
    Stopped,
}

/// Server lifecycle wrapper around [`FileService`].
///
/// `start` spawns the serve loop and returns immediately; `stop` drains
/// in-flight calls before releasing the listener. Dropping a running server
/// also triggers a graceful shutdown, without waiting for it.
pub struct FileServer {
    service: FileService,
    host: IpAddr,
    lifecycle: Lifecycle,
}

impl std::fmt::Debug for FileServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileServer")
            .field("host", &self.host)
            .field("state", &self.state())
            .field("local_addr", &self.local_addr())
            .finish_non_exhaustive()
    }
}

impl FileServer {
    /// Create a server for `usecase`, binding on all IPv4 interfaces.
    pub fn new(usecase: FileUsecase) -> Self {
        Self {
            service: FileService::new(usecase),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            lifecycle: Lifecycle::Created,
        }
    }

    /// Bind on `host` instead of all interfaces.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        match self.lifecycle {
            Lifecycle::Created => ServerState::Created,
            Lifecycle::Running { .. } => ServerState::Running,
            Lifecycle::Stopped => ServerState::Stopped,
        }
    }

    /// Address the listener is bound to, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match self.lifecycle {
            Lifecycle::Running { local_addr, .. } => Some(local_addr),
            _ => None,
        }
    }

    /// Bind `port` and start serving in a background task.
    ///
    /// Port `0` picks an ephemeral port; the bound address is returned. Only
    /// valid from [`ServerState::Created`]. A bind failure leaves the server in
    /// `Created`.
    pub async fn start(&mut self, port: u16) -> Result<SocketAddr, ServerError> {
        if !matches!(self.lifecycle, Lifecycle::Created) {
            return Err(ServerError::InvalidState(self.state()));
        }

        let addr = SocketAddr::new(self.host, port);
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(source) => {
                tracing::error!("Error starting listener on {}: {}", addr, source);
                return Err(ServerError::Listener { addr, source });
            }
        };
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Listener { addr, source })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tonic::transport::Server::builder()
            .add_service(proto::file_service_server::FileServiceServer::new(
                self.service.clone(),
            ))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                shutdown_rx.await.ok();
            });

        let handle = tokio::spawn(async move {
            let result = server.await;
            if let Err(ref e) = result {
                tracing::error!("Error serving gRPC: {}", e);
            }
            result
        });

        tracing::info!("gRPC server started on {}", local_addr);
        self.lifecycle = Lifecycle::Running {
            local_addr,
            shutdown_tx,
            handle,
        };
        Ok(local_addr)
    }

    /// Shut the server down gracefully.
    ///
    /// Stops accepting new calls, waits for in-flight calls to finish, then
    /// releases the listener. A no-op unless the server is running.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let (shutdown_tx, handle) = match std::mem::replace(&mut self.lifecycle, Lifecycle::Stopped)
        {
            Lifecycle::Running {
                shutdown_tx,
                handle,
                ..
            } => (shutdown_tx, handle),
            other => {
                self.lifecycle = other;
                return Ok(());
            }
        };

        tracing::info!("Shutting down gRPC server");
        let _ = shutdown_tx.send(());
        handle
            .await
            .map_err(|e| ServerError::Shutdown(e.to_string()))?
            .map_err(ServerError::Serve)?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}
