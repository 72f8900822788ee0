mod error;
mod server;

pub use server::UrlGrpcServer;
