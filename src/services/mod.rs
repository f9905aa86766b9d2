//! Business logic services

pub mod catalog;
pub mod credentials;
pub mod loans;
pub mod tokens;
pub mod users;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub tokens: tokens::TokenService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: &AuthConfig) -> AppResult<Self> {
        let credentials = credentials::CredentialCodec::new(auth_config)?;
        let tokens = tokens::TokenService::new(auth_config);

        Ok(Self {
            users: users::UsersService::new(repository.clone(), credentials, tokens.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            tokens,
            repository,
        })
    }
}
