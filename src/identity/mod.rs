use std::sync::Arc;

use crate::{
    auth::ProviderIdentity,
    domain::{CreateUserRequest, Role, User},
    error::{AppError, Result},
    repository::UserRepository,
};

/// Turns a provider-authenticated identity into a local `User` profile,
/// creating one on first sign-in. Resolution is idempotent per subject.
pub struct IdentityResolver {
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// The very first profile ever created gets the admin role (bootstrap
    /// rule); everyone after that starts as a student. Storage failures
    /// surface as `ProfileLoad` so callers never fall back to a guest view.
    pub async fn resolve(&self, identity: &ProviderIdentity) -> Result<User> {
        if let Some(user) = self
            .users
            .find_by_subject(&identity.subject)
            .await
            .map_err(profile_load)?
        {
            return Ok(user);
        }

        let role = if self.users.count().await.map_err(profile_load)? == 0 {
            Role::Admin
        } else {
            Role::Student
        };

        let display_name = identity
            .display_name
            .clone()
            .unwrap_or_else(synthesize_display_name);

        tracing::info!(
            subject = %identity.subject,
            ?role,
            "Creating profile for new identity"
        );

        self.users
            .create(CreateUserRequest {
                subject: identity.subject.clone(),
                role,
                display_name,
                email: identity.email.clone(),
            })
            .await
            .map_err(profile_load)
    }
}

fn profile_load(err: AppError) -> AppError {
    AppError::ProfileLoad(err.to_string())
}

const ADJECTIVES: &[&str] = &[
    "Amber", "Brisk", "Clever", "Dapper", "Eager", "Fleet", "Golden", "Hardy",
    "Keen", "Lively", "Mellow", "Nimble", "Quiet", "Rustic", "Sage", "Vivid",
];

const ANIMALS: &[&str] = &[
    "Falcon", "Heron", "Ibex", "Kestrel", "Lynx", "Marten", "Otter", "Plover",
    "Raven", "Stoat", "Tern", "Wren",
];

/// Short human-readable tag for identities whose provider supplies no name.
fn synthesize_display_name() -> String {
    use rand::seq::SliceRandom;
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES.choose(&mut rng).unwrap_or(&"Quiet");
    let animal = ANIMALS.choose(&mut rng).unwrap_or(&"Wren");
    format!("{} {}", adjective, animal)
}
