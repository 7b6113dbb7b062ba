//! Gallery permission checks
//!
//! The CMS permission engine lives outside this service. `PermissionResolver`
//! is the narrow question the bridge asks it; `RolePermissions` answers from
//! the session role alone.

use crate::auth::models::{Identity, UserRole};
use async_trait::async_trait;
use padbridge_core::models::FileReference;
use padbridge_core::AppError;

/// Gallery permissions the bridge checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    AdminFileGalleries,
    ViewFileGallery,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AdminFileGalleries => "admin_file_galleries",
            Permission::ViewFileGallery => "view_file_gallery",
        }
    }
}

#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Whether `identity` holds `permission` on `file`. `None` asks about a
    /// file that does not exist yet.
    async fn has_permission(
        &self,
        identity: &Identity,
        permission: Permission,
        file: Option<&FileReference>,
    ) -> bool;
}

/// Role-based resolver
///
/// Admins hold every permission; members and viewers may view; anonymous
/// callers may view only when the site allows it.
#[derive(Debug, Clone, Copy)]
pub struct RolePermissions {
    pub anonymous_can_view: bool,
}

impl RolePermissions {
    pub fn new(anonymous_can_view: bool) -> Self {
        Self { anonymous_can_view }
    }
}

#[async_trait]
impl PermissionResolver for RolePermissions {
    async fn has_permission(
        &self,
        identity: &Identity,
        permission: Permission,
        _file: Option<&FileReference>,
    ) -> bool {
        match (identity.role(), permission) {
            (Some(UserRole::Admin), _) => true,
            (Some(UserRole::Member | UserRole::Viewer), Permission::ViewFileGallery) => true,
            (Some(_), Permission::AdminFileGalleries) => false,
            (None, Permission::ViewFileGallery) => self.anonymous_can_view,
            (None, Permission::AdminFileGalleries) => false,
        }
    }
}

/// Require gallery admin or view permission on `file`.
pub async fn ensure_file_access(
    resolver: &dyn PermissionResolver,
    identity: &Identity,
    file: Option<&FileReference>,
) -> Result<(), AppError> {
    for permission in [Permission::AdminFileGalleries, Permission::ViewFileGallery] {
        if resolver.has_permission(identity, permission, file).await {
            return Ok(());
        }
    }
    let target = file
        .map(|f| format!("file {}", f.file_id))
        .unwrap_or_else(|| "new file".to_string());
    tracing::warn!(
        user = identity.user_name().unwrap_or("anonymous"),
        target = %target,
        "Gallery permission check failed"
    );
    Err(AppError::PermissionDenied(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> Identity {
        Identity::User {
            name: "carol".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_roles_grant_view() {
        let resolver = RolePermissions::new(false);
        for role in [UserRole::Admin, UserRole::Member, UserRole::Viewer] {
            assert!(ensure_file_access(&resolver, &user(role), None).await.is_ok());
        }
        assert!(
            !resolver
                .has_permission(&user(UserRole::Member), Permission::AdminFileGalleries, None)
                .await
        );
    }

    #[tokio::test]
    async fn test_anonymous_depends_on_site_setting() {
        let closed = RolePermissions::new(false);
        let err = ensure_file_access(&closed, &Identity::Anonymous, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));

        let open = RolePermissions::new(true);
        assert!(ensure_file_access(&open, &Identity::Anonymous, None).await.is_ok());
    }
}
