use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    auth::AuthService,
    error::{AppError, Result},
};

/// What the external identity provider hands back after an authentication
/// flow: a stable subject id plus whatever profile hints it knows.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Credentials {
    /// Guest sign-in. A returning guest presents its previous subject.
    Anonymous { subject: Option<String> },
    Password { email: String, password: String },
}

/// Pluggable identity-provider adapter. The rest of the system only ever
/// sees a `ProviderIdentity`; credential handling stays behind this seam.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn authenticate(&self, credentials: Credentials) -> Result<ProviderIdentity>;

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _display_name: Option<String>,
    ) -> Result<ProviderIdentity> {
        Err(AppError::BadRequest(
            "Registration is not supported by this identity provider".to_string(),
        ))
    }
}

/// Anonymous sign-in: every new guest gets a fresh random subject, and a
/// returning guest continues under the subject it already holds.
pub struct AnonymousProvider;

impl AnonymousProvider {
    pub fn new() -> Self {
        Self
    }

    fn generate_subject() -> String {
        use rand::RngCore;
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        format!("guest-{}", hex::encode(bytes))
    }
}

#[async_trait]
impl IdentityProvider for AnonymousProvider {
    fn name(&self) -> &str {
        "anonymous"
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<ProviderIdentity> {
        match credentials {
            Credentials::Anonymous { subject } => Ok(ProviderIdentity {
                subject: subject.unwrap_or_else(Self::generate_subject),
                email: None,
                display_name: None,
            }),
            Credentials::Password { .. } => Err(AppError::Auth(
                "The anonymous provider does not accept credentials".to_string(),
            )),
        }
    }
}

#[derive(FromRow)]
struct CredentialRow {
    subject: String,
    email: String,
    password_hash: String,
}

/// Email/password sign-in against the local credentials table.
pub struct PasswordProvider {
    pool: SqlitePool,
}

impl PasswordProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRow>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT subject, email, password_hash
            FROM credentials
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

#[async_trait]
impl IdentityProvider for PasswordProvider {
    fn name(&self) -> &str {
        "password"
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<ProviderIdentity> {
        let (email, password) = match credentials {
            Credentials::Password { email, password } => (email, password),
            Credentials::Anonymous { .. } => {
                return Err(AppError::Auth(
                    "Password sign-in requires an email and password".to_string(),
                ))
            }
        };

        let credential = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Auth("Unknown email".to_string()))?;

        if !AuthService::verify_password(&password, &credential.password_hash).await? {
            return Err(AppError::Auth("Invalid password".to_string()));
        }

        Ok(ProviderIdentity {
            subject: credential.subject,
            email: Some(credential.email),
            display_name: None,
        })
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<ProviderIdentity> {
        if self.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let subject = format!("local-{}", Uuid::new_v4());
        let password_hash = AuthService::hash_password(password).await?;
        let now_naive = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO credentials (subject, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&subject)
        .bind(email)
        .bind(&password_hash)
        .bind(now_naive)
        .execute(&self.pool)
        .await?;

        Ok(ProviderIdentity {
            subject,
            email: Some(email.to_string()),
            display_name,
        })
    }
}
