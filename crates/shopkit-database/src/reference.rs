//! Reference roles and permissions every deployment starts with.

use tracing::info;

use shopkit_core::result::AppResult;

use crate::store::RbacStore;

/// `(name, description)` of every built-in role.
pub const ROLES: &[(&str, &str)] = &[
    ("customer", "Registered shopper"),
    ("manager", "Catalog and fulfilment staff"),
    ("admin", "User and access administration"),
    ("super_admin", "Unrestricted access"),
];

/// `(name, description)` of every built-in permission.
pub const PERMISSIONS: &[(&str, &str)] = &[
    ("*:*", "Every permission"),
    ("admin:users", "Force other users out of their sessions"),
    ("user:read", "Read a single user's access"),
    ("user:read_all", "List all users"),
    ("user:write", "Change user status"),
    ("role:assign", "Assign and remove roles"),
    ("permission:assign", "Grant and revoke direct permissions"),
    ("product:read", "Browse the catalog"),
    ("product:create", "Add products to the catalog"),
    ("order:create", "Place orders"),
    ("order:read", "Read own orders"),
    ("order:read_all", "Read every order"),
];

/// Permissions carried by each built-in role.
pub const ROLE_PERMISSIONS: &[(&str, &[&str])] = &[
    ("customer", &["order:create", "order:read", "product:read"]),
    ("manager", &["product:read", "product:create", "order:read_all"]),
    (
        "admin",
        &[
            "admin:users",
            "user:read",
            "user:read_all",
            "user:write",
            "role:assign",
            "permission:assign",
            "product:read",
            "product:create",
            "order:read_all",
        ],
    ),
    ("super_admin", &["*:*"]),
];

/// What a seeding run touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub roles: usize,
    pub permissions: usize,
    pub links: usize,
}

/// Insert the reference roles and permissions. Safe to run repeatedly.
pub async fn seed_reference_data(rbac: &dyn RbacStore) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let mut roles = Vec::with_capacity(ROLES.len());
    for (name, description) in ROLES {
        roles.push(rbac.upsert_role(name, description).await?);
        summary.roles += 1;
    }

    let mut permissions = Vec::with_capacity(PERMISSIONS.len());
    for (name, description) in PERMISSIONS {
        permissions.push(rbac.upsert_permission(name, description).await?);
        summary.permissions += 1;
    }

    for (role_name, names) in ROLE_PERMISSIONS {
        let Some(role) = roles.iter().find(|r| r.name == *role_name) else {
            continue;
        };
        for name in names.iter() {
            if let Some(permission) = permissions.iter().find(|p| p.name == *name) {
                rbac.attach_permission(role.id, permission.id).await?;
                summary.links += 1;
            }
        }
    }

    info!(
        roles = summary.roles,
        permissions = summary.permissions,
        links = summary.links,
        "Reference data seeded"
    );
    Ok(summary)
}
