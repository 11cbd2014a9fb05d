//! Decides whether a change to a file's checkout holder is permitted.
//!
//! The rule is a pure function over state that was already loaded by the caller.
//! Persisting the outcome is the job of [FileService][crate::core::service::file::FileService].

use super::model::node::Permission;
use uuid::Uuid;

/// Everything the rule needs to know about a requested checkout change.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutChange<'a> {
    /// Storage provider of the file.
    pub provider: &'a str,

    /// The provider owned by this service. Only its files can be checked out.
    pub native_provider: &'a str,

    /// The user currently holding the checkout, if any.
    pub current: Option<Uuid>,

    /// The authenticated caller, `None` for anonymous requests.
    pub requester: Option<Uuid>,

    /// The caller's permission on the file's node, `None` if they are not a contributor.
    pub permission: Option<Permission>,

    /// The holder the caller wants to set. `None` is a checkin.
    pub new_holder: Option<Uuid>,
}

/// Reasons a checkout change is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The file lives in a provider that does not support checkouts.
    ForbiddenProvider(String),

    /// No caller identity.
    Unauthorized,

    /// The caller lacks the permission the change requires.
    Forbidden,

    /// The new holder is someone other than the caller.
    BadRequest,
}

/// Evaluate the change and return the resulting checkout holder.
///
/// Rules are applied in order, the first match wins:
///
/// 1. Non native providers are refused.
/// 2. Anonymous callers and non contributors are refused.
/// 3. A holder other than the caller is malformed, admins included.
/// 4. Checking out to oneself is allowed when the file is free or already held by the caller,
///    and admins may take over a checkout held by someone else.
/// 5. Checkin is allowed for the holder, admins and anyone with write permission.
pub fn evaluate(change: CheckoutChange<'_>) -> Result<Option<Uuid>, Denial> {
    let CheckoutChange {
        provider,
        native_provider,
        current,
        requester,
        permission,
        new_holder,
    } = change;

    if provider != native_provider {
        return Err(Denial::ForbiddenProvider(provider.to_string()));
    }

    let Some(requester) = requester else {
        return Err(Denial::Unauthorized);
    };

    let Some(permission) = permission else {
        return Err(Denial::Forbidden);
    };

    match new_holder {
        Some(holder) if holder != requester => Err(Denial::BadRequest),

        Some(holder) => match current {
            None => Ok(Some(holder)),
            Some(current) if current == requester => Ok(Some(holder)),
            Some(_) if permission.is_admin() => Ok(Some(holder)),
            Some(_) => Err(Denial::Forbidden),
        },

        None => match current {
            None => Ok(None),
            Some(current) if current == requester => Ok(None),
            Some(_) if permission.can_write() => Ok(None),
            Some(_) => Err(Denial::Forbidden),
        },
    }
}
