//! Registration, login, logout, password changes and forced logout.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shopkit_auth::password::{PasswordHasher, PasswordValidator, generate_password};
use shopkit_auth::rbac::PermissionCache;
use shopkit_auth::session::{IssuedSession, SessionManager, generate_token};
use shopkit_cache::keys;
use shopkit_core::config::SeedConfig;
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::traits::cache::CacheProvider;
use shopkit_core::types::UserId;
use shopkit_database::store::{RbacStore, UserStore};
use shopkit_entity::rbac::NewGrant;
use shopkit_entity::user::{CreateUser, User, UserStatus, normalize_email};

use super::input::RegisterInput;
use crate::context::Principal;

/// Message for every failed login, whatever the cause.
const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Role held by the bootstrap administrator.
const SUPER_ADMIN_ROLE: &str = "super_admin";

/// A user together with the session just issued to them.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub session: IssuedSession,
}

/// What the caller may do, as seen by the permission cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeView {
    pub user_id: UserId,
    pub email: String,
    pub roles: BTreeSet<String>,
    pub permissions: BTreeSet<String>,
}

/// Handles account and session use cases.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    rbac: Arc<dyn RbacStore>,
    sessions: SessionManager,
    permissions: PermissionCache,
    /// Holds CSRF tokens.
    cache: Arc<dyn CacheProvider>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    /// Role granted to self-registered users.
    default_role: String,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("default_role", &self.default_role)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    /// Creates a new account service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        rbac: Arc<dyn RbacStore>,
        sessions: SessionManager,
        permissions: PermissionCache,
        cache: Arc<dyn CacheProvider>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        default_role: String,
    ) -> Self {
        Self {
            users,
            rbac,
            sessions,
            permissions,
            cache,
            hasher,
            validator,
            default_role,
        }
    }

    /// Create an active account without assigning any role.
    pub async fn provision(&self, input: RegisterInput) -> AppResult<User> {
        let input = input.normalized(&self.validator)?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .users
            .create(&CreateUser {
                first_name: input.first_name,
                middle_name: input.middle_name,
                last_name: input.last_name,
                email: input.email,
                password_hash,
                phone: input.phone,
                status: UserStatus::Active,
            })
            .await?;

        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Assign the role called `role` to `user_id`.
    ///
    /// Returns `false` when no such role exists.
    pub async fn assign_named_role(
        &self,
        user_id: UserId,
        role: &str,
        assigned_by: Option<UserId>,
    ) -> AppResult<bool> {
        let Some(role) = self.rbac.find_role_by_name(role).await? else {
            return Ok(false);
        };
        self.rbac
            .assign_role(&NewGrant {
                user_id,
                target: role.id,
                granted_by: assigned_by,
                expires_at: None,
            })
            .await?;
        self.permissions.invalidate(user_id).await;
        Ok(true)
    }

    /// Create the configured super administrator with a generated password.
    ///
    /// Returns `None` when an account with that email already exists; it is
    /// left untouched. The password is only ever returned here.
    pub async fn bootstrap_admin(&self, seed: &SeedConfig) -> AppResult<Option<(User, String)>> {
        if self
            .users
            .find_by_email(&normalize_email(&seed.admin_email))
            .await?
            .is_some()
        {
            info!(email = %seed.admin_email, "Admin account already exists, skipping");
            return Ok(None);
        }

        let password = generate_password();
        let user = self
            .provision(RegisterInput {
                first_name: seed.admin_first_name.clone(),
                middle_name: None,
                last_name: seed.admin_last_name.clone(),
                email: seed.admin_email.clone(),
                password: password.clone(),
                phone: None,
            })
            .await?;

        if !self.assign_named_role(user.id, SUPER_ADMIN_ROLE, None).await? {
            return Err(AppError::not_found(format!(
                "role {SUPER_ADMIN_ROLE} does not exist, seed the reference data first"
            )));
        }

        info!(user_id = %user.id, "Admin account created");
        Ok(Some((user, password)))
    }

    /// Register a new customer and sign them in.
    ///
    /// `previous_token` is whatever token the request carried; it is
    /// destroyed as part of issuing the new session.
    pub async fn register(
        &self,
        input: RegisterInput,
        previous_token: Option<&str>,
    ) -> AppResult<AuthOutcome> {
        let user = self.provision(input).await?;

        if !self
            .assign_named_role(user.id, &self.default_role, Some(user.id))
            .await?
        {
            warn!(role = %self.default_role, "Default role does not exist, registering without it");
        }

        let session = self.sessions.issue(user.id, previous_token).await?;
        Ok(AuthOutcome { user, session })
    }

    /// Check credentials and issue a session.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        previous_token: Option<&str>,
    ) -> AppResult<AuthOutcome> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            self.hasher.burn(password);
            warn!("Login attempt for unknown email");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !user.can_login() {
            warn!(user_id = %user.id, "Login attempt for inactive account");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let session = self.sessions.issue(user.id, previous_token).await?;
        info!(user_id = %user.id, "Login successful");
        Ok(AuthOutcome { user, session })
    }

    /// Resolve a raw token into the acting principal.
    pub async fn authenticate(&self, token: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .sessions
            .resolve(token)
            .await?
            .map(|session| Principal::new(&session)))
    }

    /// End the caller's session. A request without a session is a no-op.
    pub async fn logout(&self, principal: Option<&Principal>) -> AppResult<()> {
        let Some(principal) = principal else {
            return Ok(());
        };

        self.permissions.invalidate(principal.user_id).await;
        if let Err(e) = self.cache.delete(&keys::csrf(&principal.session_id)).await {
            warn!(error = %e, "Failed to drop CSRF token");
        }
        self.sessions.destroy(&principal.session_id).await?;

        info!(user_id = %principal.user_id, "Logout completed");
        Ok(())
    }

    /// End every session of `target`. Fails with not-found when none was live.
    pub async fn force_logout(&self, actor: &Principal, target: UserId) -> AppResult<u64> {
        self.permissions.invalidate(target).await;
        let destroyed = self.sessions.destroy_all_for_user(target).await?;
        if destroyed == 0 {
            return Err(AppError::not_found(format!(
                "user {target} has no active session"
            )));
        }

        info!(actor = %actor.user_id, target = %target, destroyed, "Forced logout");
        Ok(destroyed)
    }

    /// The caller's identity and grants, through the permission cache.
    pub async fn me(&self, principal: &Principal) -> AppResult<MeView> {
        let snapshot = self.permissions.load(principal.user_id).await?;
        Ok(MeView {
            user_id: snapshot.user_id,
            email: snapshot.email,
            roles: snapshot.roles,
            permissions: snapshot.permissions,
        })
    }

    /// Replace the caller's password after checking the current one.
    pub async fn change_password(
        &self,
        principal: &Principal,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        self.validator.validate(new_password)?;

        let user = self
            .users
            .find_by_id(principal.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::validation("current password is incorrect"));
        }

        let new_hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(user.id, &new_hash).await?;
        self.permissions.invalidate(user.id).await;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Set a generated password for the account behind `email`.
    ///
    /// Every session of the account is ended. Returns the new password.
    pub async fn reset_password(&self, email: &str) -> AppResult<String> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::not_found(format!("no user with email {email}")))?;

        let password = generate_password();
        let hash = self.hasher.hash_password(&password)?;
        self.users.update_password(user.id, &hash).await?;
        self.sessions.destroy_all_for_user(user.id).await?;
        self.permissions.invalidate(user.id).await;

        info!(user_id = %user.id, "Password reset");
        Ok(password)
    }

    /// Issue a CSRF token bound to the caller's session.
    pub async fn csrf_token(&self, principal: &Principal) -> AppResult<String> {
        let ttl = (principal.expires_at - Utc::now())
            .to_std()
            .map_err(|_| AppError::session("session has expired"))?;

        let token = generate_token();
        self.cache
            .set(&keys::csrf(&principal.session_id), &token, ttl)
            .await?;
        Ok(token)
    }
}
