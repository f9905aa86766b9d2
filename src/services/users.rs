//! Account directory: signup, login and self-service profile management

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{Account, Identity, LoginRequest, SignupRequest, UpdateProfile},
    repository::Repository,
};

use super::{credentials::CredentialCodec, tokens::TokenService};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    credentials: CredentialCodec,
    tokens: TokenService,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UsersService {
    pub fn new(repository: Repository, credentials: CredentialCodec, tokens: TokenService) -> Self {
        Self {
            repository,
            credentials,
            tokens,
        }
    }

    /// Create an account; the password is stored hashed
    pub async fn create_account(&self, request: SignupRequest) -> AppResult<Account> {
        request.validate()?;
        let email = normalize_email(&request.email);

        if self.repository.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyExists("User already exists".to_string()));
        }

        let password_hash = self.credentials.hash(&request.password)?;
        let account = Account::new(
            request.name.trim().to_string(),
            email,
            password_hash,
            request.role.unwrap_or_default(),
        );
        self.repository.users.insert(&account).await?;

        tracing::info!(user_id = %account.id, role = %account.role, "Account created");
        Ok(account)
    }

    /// Register and log in at once; returns a token for the new account
    pub async fn signup(&self, request: SignupRequest) -> AppResult<String> {
        let account = self.create_account(request).await?;
        self.tokens.issue(&Identity::from(&account))
    }

    /// Check credentials and return a fresh token
    pub async fn login(&self, request: LoginRequest) -> AppResult<String> {
        let account = self
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !self.credentials.verify(&request.password, &account.password_hash) {
            tracing::warn!(user_id = %account.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.tokens.issue(&Identity::from(&account))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.repository.users.find_by_email(&normalize_email(email)).await
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Account> {
        self.repository
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Patch name and/or password; a new password is re-hashed before saving
    pub async fn update_profile(&self, id: Uuid, profile: UpdateProfile) -> AppResult<Account> {
        profile.validate()?;
        let mut account = self.get_by_id(id).await?;

        if let Some(name) = profile.name {
            account.name = name.trim().to_string();
        }
        if let Some(ref password) = profile.password {
            account.password_hash = self.credentials.hash(password)?;
        }
        account.updated_at = Utc::now();

        self.repository.users.save(&account).await?;
        Ok(account)
    }

    /// Remove the account. Books it wrote or borrowed keep their references.
    pub async fn delete_account(&self, id: Uuid) -> AppResult<u64> {
        let deleted = self.repository.users.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = %id, "Account deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AuthConfig, models::Role};

    fn service() -> UsersService {
        let config = AuthConfig {
            password_memory_kib: 64,
            password_iterations: 1,
            ..AuthConfig::default()
        };
        UsersService::new(
            Repository::in_memory(),
            CredentialCodec::new(&config).unwrap(),
            TokenService::new(&config),
        )
    }

    fn signup(email: &str, role: Option<Role>) -> SignupRequest {
        SignupRequest {
            name: "Mary Shelley".to_string(),
            email: email.to_string(),
            password: "frankenstein".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_signup_once_per_email() {
        let users = service();
        users.signup(signup("mary@example.com", None)).await.unwrap();

        let err = users
            .signup(signup("Mary@Example.com", Some(Role::Author)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_signup_defaults_to_reader_and_hashes() {
        let users = service();
        let account = users.create_account(signup("mary@example.com", None)).await.unwrap();
        assert_eq!(account.role, Role::Reader);
        assert_ne!(account.password_hash, "frankenstein");
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let users = service();
        let err = users.signup(signup("not-an-email", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_token_matches_account() {
        let users = service();
        let account = users
            .create_account(signup("mary@example.com", Some(Role::Author)))
            .await
            .unwrap();

        let token = users
            .login(LoginRequest {
                email: "mary@example.com".to_string(),
                password: "frankenstein".to_string(),
            })
            .await
            .unwrap();

        let claims = users.tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.role, Role::Author);
        assert_eq!(claims.email, account.email);
    }

    #[tokio::test]
    async fn test_login_wrong_password_always_fails() {
        let users = service();
        users.create_account(signup("mary@example.com", None)).await.unwrap();

        for _ in 0..3 {
            let err = users
                .login(LoginRequest {
                    email: "mary@example.com".to_string(),
                    password: "victor".to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let err = service()
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_password_update_rehashes() {
        let users = service();
        let account = users.create_account(signup("mary@example.com", None)).await.unwrap();

        let updated = users
            .update_profile(
                account.id,
                UpdateProfile {
                    name: Some("M. Shelley".to_string()),
                    password: Some("prometheus".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "M. Shelley");
        assert_ne!(updated.password_hash, account.password_hash);

        let login = |password: &str| LoginRequest {
            email: "mary@example.com".to_string(),
            password: password.to_string(),
        };
        assert!(users.login(login("prometheus")).await.is_ok());
        assert!(matches!(
            users.login(login("frankenstein")).await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let users = service();
        let account = users.create_account(signup("mary@example.com", None)).await.unwrap();

        assert_eq!(users.delete_account(account.id).await.unwrap(), 1);
        assert!(matches!(users.get_by_id(account.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            users.delete_account(account.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
