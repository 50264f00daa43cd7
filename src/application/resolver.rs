use crate::domain::ports::IdentityLookupRef;
use crate::domain::user::{ResolvedUser, UserReference};
use crate::error::{LedgerError, Result};
use tracing::debug;

/// Turns whatever the caller typed into a canonical `ResolvedUser`.
///
/// Mentions that already carry a display name are trusted; everything else is
/// looked up, with no caching between calls.
#[derive(Clone)]
pub struct UserReferenceResolver {
    lookup: IdentityLookupRef,
}

impl UserReferenceResolver {
    pub fn new(lookup: IdentityLookupRef) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, handle: &str) -> Result<ResolvedUser> {
        let reference = UserReference::parse(handle).ok_or_else(|| {
            LedgerError::ValidationError(format!("`{}` is not a user reference", handle))
        })?;

        match reference {
            UserReference::Mention {
                id,
                display_name: Some(name),
            } => Ok(ResolvedUser::new(id, name)),
            UserReference::Mention {
                id,
                display_name: None,
            }
            | UserReference::Id(id) => {
                debug!(user_id = %id, "looking up display name");
                let name = self.lookup.display_name(&id).await?;
                Ok(ResolvedUser::new(id, name))
            }
        }
    }
}
