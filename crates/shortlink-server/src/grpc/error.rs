use shortlink_service::ServiceError;
use thiserror::Error;
use tonic::{Code, Status};
use tracing::error;

#[derive(Debug, Error)]
pub(crate) enum GrpcError {
    #[error("short url is required")]
    ShortUrlRequired,
    #[error("original url is required")]
    OriginalUrlRequired,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<GrpcError> for Status {
    fn from(error: GrpcError) -> Self {
        match error {
            GrpcError::ShortUrlRequired => {
                Status::new(Code::InvalidArgument, "short url is required")
            }
            GrpcError::OriginalUrlRequired => {
                Status::new(Code::InvalidArgument, "original url is required")
            }
            GrpcError::Service(source) if source.is_invalid_input() => {
                Status::new(Code::InvalidArgument, source.to_string())
            }
            GrpcError::Service(ServiceError::NotFound(_)) => {
                Status::new(Code::NotFound, "URL not found")
            }
            GrpcError::Service(source) => {
                error!(error = %source, "Request failed");
                Status::new(Code::Internal, source.to_string())
            }
        }
    }
}
