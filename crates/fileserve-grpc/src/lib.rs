//! Fileserve gRPC Service
//!
//! Exposes a [`fileserve::FileUsecase`] over gRPC and provides a matching
//! client.
//!
//! # Architecture
//!
//! Every server call runs through a fixed chain of stages before reaching the
//! handler, and every client call through a logging stage before reaching the
//! network:
//!
//! ```text
//! FileClient                                 FileServer
//! │                                            │
//! │ client logging (start timer)               │
//! │   deadline                                 │
//! │ ─────────── GetFileInfo{filename} ───────> │ logging (start timer)
//! │                                            │   validation
//! │                                            │     handler ─> FileUsecase ─> repository
//! │ <────────── FileInfoResponse ───────────── │ logging (duration, outcome)
//! │ client logging (duration, outcome)         │
//! ```
//!
//! Validation failures never reach the usecase. Repository "missing file"
//! errors become `NOT_FOUND`; any other repository failure becomes `INTERNAL`.

pub mod proto {
    #![allow(missing_docs)]
    #![allow(clippy::doc_markdown)]
    tonic::include_proto!("fileserve.v1");
}

mod client;
mod interceptor;
mod server;
mod validate;

pub use client::{
    ClientConfig, ClientError, DEFAULT_CALL_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, FileClient,
};
pub use server::{FileServer, FileService, ServerError, ServerState};
pub use validate::{Validate, ValidationError};

// Re-export proto types for convenience
pub use proto::{
    file_service_client::FileServiceClient,
    file_service_server::FileServiceServer as FileGrpcServer,
};

/// Fully-qualified RPC method names, as they appear in logs.
pub mod method {
    /// `ListFiles`
    pub const LIST_FILES: &str = "/fileserve.v1.FileService/ListFiles";
    /// `GetFileInfo`
    pub const GET_FILE_INFO: &str = "/fileserve.v1.FileService/GetFileInfo";
    /// `GetFileContent`
    pub const GET_FILE_CONTENT: &str = "/fileserve.v1.FileService/GetFileContent";
}
