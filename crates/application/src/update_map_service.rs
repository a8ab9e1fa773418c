use tracing::{debug, info};
use updatemap_core::{AppResult, UserIdentity};
use updatemap_domain::{UpdateMap, UpdateRequest};

use crate::create_update_map;

/// Application service that stages partial record updates for a caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateMapService;

impl UpdateMapService {
    /// Creates a new update map service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the column map for `request` on behalf of `actor`.
    ///
    /// Admin-only fields set by a non-admin actor fail with
    /// [`AppError::Forbidden`](updatemap_core::AppError::Forbidden).
    pub fn create_update_map<R>(&self, actor: &UserIdentity, request: &R) -> AppResult<UpdateMap>
    where
        R: UpdateRequest + ?Sized,
    {
        match create_update_map(request, actor.is_admin()) {
            Ok(update_map) => {
                debug!(
                    subject = actor.subject(),
                    columns = ?update_map.columns().collect::<Vec<_>>(),
                    "staged partial update"
                );
                Ok(update_map)
            }
            Err(error) => {
                info!(
                    subject = actor.subject(),
                    column = error.column(),
                    "rejected partial update of admin-only field"
                );
                Err(error.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use updatemap_core::{AppError, UserIdentity};
    use updatemap_domain::{PatchValue, update_request};

    use super::UpdateMapService;

    update_request! {
        #[derive(Debug, Default)]
        struct UpdateMember {
            #[patch(json = "nickname")]
            pub nickname: Option<String>,
            #[patch(json = "role", admin_only = "true")]
            pub role: Option<String>,
        }
    }

    #[test]
    fn non_admin_actor_is_forbidden_from_admin_only_fields() {
        let service = UpdateMapService::new();
        let actor = UserIdentity::new("user-1", false);
        let request = UpdateMember {
            role: Some("owner".to_owned()),
            ..UpdateMember::default()
        };

        let result = service.create_update_map(&actor, &request);

        assert!(matches!(
            result,
            Err(AppError::Forbidden(message))
                if message == "Only admins can update field 'role'."
        ));
    }

    #[test]
    fn admin_actor_stages_admin_only_fields() {
        let service = UpdateMapService::new();
        let actor = UserIdentity::new("admin-1", true);
        let request = UpdateMember {
            nickname: Some("gh".to_owned()),
            role: Some("owner".to_owned()),
        };

        let update_map = service
            .create_update_map(&actor, &request)
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(update_map.len(), 2);
        assert_eq!(
            update_map.get("role"),
            Some(&PatchValue::Text("owner".to_owned()))
        );
    }
}
