use sqlx::{Pool, Sqlite};
use std::sync::Arc;

use crate::config::Config;
use crate::media::MediaClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub config: Arc<Config>,
    pub media: MediaClient,
}
