use std::{fs::File, sync::Arc};

use carbon_passport::{
    gateway::{Gateway, MemoryGateway},
    repository::Repository,
};
use tracing::info;

use crate::config::Config;

pub struct AppState {
    pub config: Config,
    pub repository: Arc<Repository>,
    pub gateway: Arc<dyn Gateway>,
}

impl AppState {
    pub fn new(config: Config, repository: Arc<Repository>, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            config,
            repository,
            gateway,
        }
    }

    /// Loads the station directory and backs it with an in-memory gateway.
    pub fn load(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let repository = match &config.stations_path {
            Some(path) => {
                info!("Loading stations from {}", path.display());
                Repository::new().load_csv(File::open(path)?)?
            }
            None => Repository::bundled()?,
        };
        let repository = Arc::new(repository);
        let gateway = Arc::new(MemoryGateway::new(repository.clone(), &config.base_url));
        Ok(Self::new(config, repository, gateway))
    }
}
