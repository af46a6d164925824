use std::sync::Arc;

use crate::{
    domain::{Role, SwitchAccountRequest, User},
    error::{AppError, Result},
    repository::UserRepository,
};

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Directory listing, admin only.
    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>> {
        if actor.role != Role::Admin {
            return Err(AppError::Authorization);
        }

        self.users.list().await
    }

    /// The account-switch affordance: overwrites role and display name.
    /// Anyone may switch their own record; only admins may touch another's.
    pub async fn switch_account(&self, actor: &User, request: SwitchAccountRequest) -> Result<User> {
        let target_id = request.user_id.unwrap_or(actor.id);

        if target_id != actor.id && actor.role != Role::Admin {
            return Err(AppError::Authorization);
        }

        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let display_name = request.display_name.unwrap_or(target.display_name);

        self.users
            .update_profile(target_id, request.role, &display_name)
            .await
    }
}
