mod url;

pub use url::{
    CreateUrlRequest, ErrorResponse, HealthResponse, ShortUrlQuery, ShortUrlResponse, UrlResponse,
};
