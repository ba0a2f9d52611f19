use std::sync::Arc;

use crate::application::ports::bootcamp_repository::BootcampRepository;
use crate::application::ports::geocoder::Geocoder;
use crate::application::ports::mailer::Mailer;
use crate::application::ports::photo_store::PhotoStore;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    bootcamp_repo: Arc<dyn BootcampRepository>,
    mailer: Arc<dyn Mailer>,
    geocoder: Arc<dyn Geocoder>,
    photo_store: Arc<dyn PhotoStore>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        bootcamp_repo: Arc<dyn BootcampRepository>,
        mailer: Arc<dyn Mailer>,
        geocoder: Arc<dyn Geocoder>,
        photo_store: Arc<dyn PhotoStore>,
    ) -> Self {
        Self {
            user_repo,
            bootcamp_repo,
            mailer,
            geocoder,
            photo_store,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn bootcamp_repo(&self) -> Arc<dyn BootcampRepository> {
        self.services.bootcamp_repo.clone()
    }

    pub fn mailer(&self) -> Arc<dyn Mailer> {
        self.services.mailer.clone()
    }

    pub fn geocoder(&self) -> Arc<dyn Geocoder> {
        self.services.geocoder.clone()
    }

    pub fn photo_store(&self) -> Arc<dyn PhotoStore> {
        self.services.photo_store.clone()
    }
}
