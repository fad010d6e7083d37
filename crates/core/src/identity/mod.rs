//! Identity resolution
//!
//! The identity provider is the only authority on who is acting and with
//! which role. Roles are read from the linked profile on every call.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Actor, Profile, Role};
use crate::storage::ProfileRepository;

/// Shortest accepted display name
pub const MIN_NAME_LEN: usize = 3;

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(Error::InvalidOperation(format!(
            "name must be at least {} characters",
            MIN_NAME_LEN
        )));
    }
    Ok(name)
}

/// Create the club profile for a freshly authenticated account.
///
/// New profiles always start as members.
pub fn register<P: ProfileRepository + ?Sized>(
    profiles: &P,
    user_id: Uuid,
    name: &str,
    email: &str,
) -> Result<Profile> {
    let name = validate_name(name)?;
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::InvalidOperation("email is required".to_string()));
    }

    let profile = Profile::new(user_id, name.to_string(), email.to_string());
    profiles.create_profile(&profile)?;
    info!(%user_id, "Profile registered");
    Ok(profile)
}

/// Change the current actor's display name
pub fn rename_current<P, I>(profiles: &P, identity: &I, name: &str) -> Result<()>
where
    P: ProfileRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    let actor = identity
        .current_actor()?
        .ok_or_else(|| Error::PermissionDenied("sign in to edit your profile".to_string()))?;
    let name = validate_name(name)?;
    profiles.update_profile_name(&actor, actor.id, name)
}

/// Yields the current actor, or `None` for an unauthenticated viewer
pub trait IdentityProvider {
    fn current_actor(&self) -> Result<Option<Actor>>;
}

/// A viewer that never signs in
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_actor(&self) -> Result<Option<Actor>> {
        Ok(None)
    }
}

/// Resolves an authenticated session's user id against the profile store
pub struct SessionIdentity<'a, P: ProfileRepository + ?Sized> {
    profiles: &'a P,
    user_id: Option<Uuid>,
}

impl<'a, P: ProfileRepository + ?Sized> SessionIdentity<'a, P> {
    pub fn new(profiles: &'a P, user_id: Option<Uuid>) -> Self {
        Self { profiles, user_id }
    }

    pub fn signed_in(profiles: &'a P, user_id: Uuid) -> Self {
        Self::new(profiles, Some(user_id))
    }
}

impl<P: ProfileRepository + ?Sized> IdentityProvider for SessionIdentity<'_, P> {
    fn current_actor(&self) -> Result<Option<Actor>> {
        let Some(user_id) = self.user_id else {
            return Ok(None);
        };

        match self.profiles.find_profile_by_id(user_id)? {
            Some(profile) => {
                debug!(%user_id, role = profile.role.as_str(), "Resolved actor");
                Ok(Some(profile.actor()))
            }
            None => {
                // Signed in but never registered a profile
                warn!(%user_id, "No profile for session user, treating as guest");
                Ok(Some(Actor::new(user_id, Role::Guest)))
            }
        }
    }
}
