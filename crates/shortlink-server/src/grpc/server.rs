use crate::grpc::error::GrpcError;
use shortlink_core::ShortCode;
use shortlink_proto_schema::v1 as proto;
use shortlink_proto_schema::v1::url_service_server::UrlService;
use shortlink_service::{Resolved, ServiceError, UrlResolver};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::trace;

/// gRPC adapter for `shortlink.v1.UrlService`.
#[derive(Clone)]
pub struct UrlGrpcServer {
    resolver: Arc<dyn UrlResolver>,
}

impl UrlGrpcServer {
    pub fn new(resolver: Arc<dyn UrlResolver>) -> Self {
        Self { resolver }
    }
}

fn url_from_resolved(resolved: Resolved) -> proto::Url {
    match resolved {
        Resolved::Stored(record) => record.into(),
        Resolved::Cached {
            short_code,
            original_url,
        } => proto::Url {
            id: None,
            original_url,
            short_url: short_code.to_string(),
            created_at: None,
        },
    }
}

#[tonic::async_trait]
impl UrlService for UrlGrpcServer {
    async fn create_url(
        &self,
        request: Request<proto::CreateUrlRequest>,
    ) -> Result<Response<proto::CreateUrlResponse>, Status> {
        let request = request.into_inner();
        trace!(original_url = %request.original_url, "CreateUrl");

        let record = self
            .resolver
            .create(&request.original_url)
            .await
            .map_err(GrpcError::from)?;

        Ok(Response::new(proto::CreateUrlResponse {
            url: Some(record.into()),
        }))
    }

    async fn get_url(
        &self,
        request: Request<proto::GetUrlRequest>,
    ) -> Result<Response<proto::GetUrlResponse>, Status> {
        let request = request.into_inner();
        if request.short_url.is_empty() {
            return Err(GrpcError::ShortUrlRequired.into());
        }
        trace!(short_url = %request.short_url, "GetUrl");

        let code = ShortCode::new(&request.short_url)
            .map_err(|e| GrpcError::from(ServiceError::from(e)))?;
        let resolved = self
            .resolver
            .resolve_by_code(&code)
            .await
            .map_err(GrpcError::from)?;

        Ok(Response::new(proto::GetUrlResponse {
            url: Some(url_from_resolved(resolved)),
        }))
    }

    async fn get_short_url(
        &self,
        request: Request<proto::GetShortUrlRequest>,
    ) -> Result<Response<proto::GetShortUrlResponse>, Status> {
        let request = request.into_inner();
        if request.original_url.is_empty() {
            return Err(GrpcError::OriginalUrlRequired.into());
        }
        trace!(original_url = %request.original_url, "GetShortUrl");

        let code = self
            .resolver
            .resolve_code_by_url(&request.original_url)
            .await
            .map_err(GrpcError::from)?;

        Ok(Response::new(proto::GetShortUrlResponse {
            short_url: code.into(),
        }))
    }
}
