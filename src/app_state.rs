use crate::{Config, store::CatalogStore};

pub struct AppState {
    pub store: CatalogStore,
    pub config: Config,
}
