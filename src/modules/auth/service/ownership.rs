use super::token::Identity;
use crate::modules::user::repository::Role;
use crate::utils::database::Database;

/// A mutable resource, addressed by id, whose owner can be resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum Resource {
    Restaurant(String),
    Menu(String),
    MenuItem(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DenyReason {
    NotFound,
    NotOwner,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Error {
    UnexpectedError,
}

impl Resource {
    /// Walks item -> menu -> restaurant and returns the owning user id.
    /// A missing or soft-deleted link anywhere in the chain yields `None`.
    pub async fn resolve_owner_id(&self, db: &Database) -> Result<Option<String>, Error> {
        match self {
            Resource::Restaurant(id) => db
                .restaurants
                .find_owner_id(id)
                .await
                .map_err(|_| Error::UnexpectedError),
            Resource::Menu(id) => db
                .menus
                .find_owner_id(id)
                .await
                .map_err(|_| Error::UnexpectedError),
            Resource::MenuItem(id) => db
                .menu_items
                .find_owner_id(id)
                .await
                .map_err(|_| Error::UnexpectedError),
        }
    }
}

pub async fn authorize(
    db: &Database,
    identity: &Identity,
    resource: &Resource,
) -> Result<Decision, Error> {
    if identity.role.satisfies(Role::Admin) {
        return Ok(Decision::Allow);
    }

    let decision = match resource.resolve_owner_id(db).await? {
        None => Decision::Deny(DenyReason::NotFound),
        Some(owner_id) if owner_id != identity.id => Decision::Deny(DenyReason::NotOwner),
        Some(_) => Decision::Allow,
    };

    if let Decision::Deny(reason) = decision {
        tracing::warn!(
            user_id = %identity.id,
            ?resource,
            ?reason,
            "Denied access to resource"
        );
    }

    Ok(decision)
}
