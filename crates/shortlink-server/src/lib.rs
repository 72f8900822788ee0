//! Protocol fronts for the shortlink service.
//!
//! Both fronts are thin adapters over an `Arc<dyn UrlResolver>`: the gRPC
//! [`grpc::UrlGrpcServer`] and the axum [`http::App`] router. They only
//! translate requests and map errors to protocol status codes.

pub mod grpc;
pub mod http;
pub mod telemetry;
