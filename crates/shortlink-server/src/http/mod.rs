mod app;
mod error;
mod handlers;
mod model;
mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
