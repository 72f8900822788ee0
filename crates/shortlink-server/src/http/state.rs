use std::sync::Arc;

use shortlink_service::UrlResolver;

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn UrlResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn UrlResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &dyn UrlResolver {
        self.resolver.as_ref()
    }
}
