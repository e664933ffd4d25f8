//! Interceptor stages run around every call.
//!
//! Server side, each call passes through a fixed chain:
//!
//! 1. [`logging`] times the rest of the chain and records its outcome.
//! 2. [`validation`] rejects malformed requests with `INVALID_ARGUMENT`.
//! 3. The handler itself.
//!
//! Client side, [`client_logging`] times each call, including the wait on its
//! deadline.
//!
//! Each stage is a plain async function of `(request, next)`, so stages can
//! be exercised on their own.

use std::future::Future;
use std::time::Instant;

use tonic::{Request, Response, Status};

use crate::client::ClientError;
use crate::validate::Validate;

/// Run `handler` through the full server chain.
pub(crate) async fn server_chain<Req, Resp, H, Fut>(
    method: &'static str,
    request: Request<Req>,
    handler: H,
) -> Result<Response<Resp>, Status>
where
    Req: Validate,
    H: FnOnce(Request<Req>) -> Fut,
    Fut: Future<Output = Result<Response<Resp>, Status>>,
{
    logging(method, validation(request, handler)).await
}

/// Validation stage. Short-circuits before `next` when the request is invalid.
pub(crate) async fn validation<Req, Resp, H, Fut>(
    request: Request<Req>,
    next: H,
) -> Result<Response<Resp>, Status>
where
    Req: Validate,
    H: FnOnce(Request<Req>) -> Fut,
    Fut: Future<Output = Result<Response<Resp>, Status>>,
{
    if let Err(e) = request.get_ref().validate() {
        return Err(Status::invalid_argument(e.to_string()));
    }
    next(request).await
}

/// Logging stage.
///
/// The returned error keeps the inner status code; its message is prefixed
/// with the method name.
pub(crate) async fn logging<T, Fut>(method: &'static str, inner: Fut) -> Result<T, Status>
where
    Fut: Future<Output = Result<T, Status>>,
{
    let start = Instant::now();
    let result = inner.await;
    let elapsed = start.elapsed();
    tracing::info!("gRPC method {} took {:?}", method, elapsed);

    result.map_err(|status| {
        let message = format!("gRPC method {} failed: {}", method, status.message());
        tracing::warn!(code = ?status.code(), "{}", message);
        Status::new(status.code(), message)
    })
}

/// Client logging stage. Records duration and failure, never changes the error.
pub(crate) async fn client_logging<T, Fut>(
    method: &'static str,
    call: Fut,
) -> Result<T, ClientError>
where
    Fut: Future<Output = Result<T, ClientError>>,
{
    let start = Instant::now();
    let result = call.await;
    let elapsed = start.elapsed();
    tracing::info!("gRPC method {} took {:?}", method, elapsed);

    if let Err(ref e) = result {
        tracing::warn!("gRPC method {} failed: {}", method, e.message());
    }
    result
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tonic::Code;

    use super::*;
    use crate::method;
    use crate::proto::{FileInfoRequest, FileInfoResponse};

    fn info_request(filename: &str) -> Request<FileInfoRequest> {
        Request::new(FileInfoRequest {
            filename: filename.to_string(),
        })
    }

    fn echo(request: Request<FileInfoRequest>) -> Result<Response<FileInfoResponse>, Status> {
        Ok(Response::new(FileInfoResponse {
            filename: request.into_inner().filename,
            size: 1,
        }))
    }

    #[tokio::test]
    async fn test_validation_short_circuits() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let status = validation(info_request(""), |req| async move {
            counter.fetch_add(1, Ordering::SeqCst);
            echo(req)
        })
        .await
        .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "filename must not be empty");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validation_passes_valid_request() {
        let response = validation(info_request("a.txt"), |req| async move { echo(req) })
            .await
            .unwrap();
        assert_eq!(response.into_inner().filename, "a.txt");
    }

    #[tokio::test]
    async fn test_logging_preserves_code() {
        let status = logging::<(), _>(method::GET_FILE_INFO, async {
            Err(Status::not_found("file not found: a.txt"))
        })
        .await
        .unwrap_err();

        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(
            status.message(),
            "gRPC method /fileserve.v1.FileService/GetFileInfo failed: file not found: a.txt"
        );
    }

    #[tokio::test]
    async fn test_chain_logs_validation_failures() {
        let status = server_chain(method::GET_FILE_CONTENT, info_request(""), |req| async move {
            echo(req)
        })
        .await
        .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(
            status
                .message()
                .starts_with("gRPC method /fileserve.v1.FileService/GetFileContent failed")
        );
        assert!(status.message().ends_with("filename must not be empty"));
    }

    #[tokio::test]
    async fn test_client_logging_keeps_error_kind() {
        let err = client_logging::<(), _>(method::LIST_FILES, async {
            Err(ClientError::DeadlineExceeded {
                method: method::LIST_FILES,
                timeout: Duration::from_millis(10),
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ClientError::DeadlineExceeded { .. }));

        let err = client_logging::<(), _>(method::LIST_FILES, async {
            Err(ClientError::Status(Status::internal("boom")))
        })
        .await
        .unwrap_err();
        assert_eq!(err.code(), Some(Code::Internal));
        assert_eq!(err.message(), "boom");
    }
}
