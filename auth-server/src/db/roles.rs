//! Role memberships and primary-role resolution
//!
//! A user may hold several role memberships at once (an "owner" registrant
//! ends up with both a customer row and a manager pair). The session carries
//! a single primary role, picked by fixed priority:
//! admin > owner > agent > customer.

use serde::Serialize;
use sqlx::PgPool;

/// The four role labels the API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Admin,
    Owner,
    Agent,
    Customer,
}

impl RoleKind {
    /// Parse the `role` field of a register request. Unknown values fall
    /// back to customer.
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => RoleKind::Admin,
            "owner" => RoleKind::Owner,
            "agent" => RoleKind::Agent,
            _ => RoleKind::Customer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Admin => "admin",
            RoleKind::Owner => "owner",
            RoleKind::Agent => "agent",
            RoleKind::Customer => "customer",
        }
    }
}

/// One role membership, shaped as the frontend receives it in `roleData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RoleMembership {
    Admin {
        admin_id: i64,
    },
    Owner {
        staff_id: i64,
        manager_id: i64,
        restaurant_id: Option<i64>,
    },
    Agent {
        staff_id: i64,
        agent_id: i64,
        restaurant_id: Option<i64>,
    },
    Customer {
        customer_id: i64,
    },
}

impl RoleMembership {
    pub fn kind(&self) -> RoleKind {
        match self {
            RoleMembership::Admin { .. } => RoleKind::Admin,
            RoleMembership::Owner { .. } => RoleKind::Owner,
            RoleMembership::Agent { .. } => RoleKind::Agent,
            RoleMembership::Customer { .. } => RoleKind::Customer,
        }
    }
}

/// Load all role memberships for a user.
pub async fn load_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<RoleMembership>, sqlx::Error> {
    let mut roles = Vec::new();

    if let Some((admin_id,)) =
        sqlx::query_as::<_, (i64,)>("SELECT admin_id FROM admins WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
    {
        roles.push(RoleMembership::Admin { admin_id });
    }

    let managers: Vec<(i64, i64, Option<i64>)> = sqlx::query_as(
        "SELECT s.staff_id, m.manager_id, s.restaurant_id
            FROM restaurant_staff s
            INNER JOIN restaurant_managers m ON m.staff_id = s.staff_id
            WHERE s.user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    for (staff_id, manager_id, restaurant_id) in managers {
        roles.push(RoleMembership::Owner {
            staff_id,
            manager_id,
            restaurant_id,
        });
    }

    let agents: Vec<(i64, i64, Option<i64>)> = sqlx::query_as(
        "SELECT s.staff_id, d.agent_id, s.restaurant_id
            FROM restaurant_staff s
            INNER JOIN delivery_agents d ON d.staff_id = s.staff_id
            WHERE s.user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    for (staff_id, agent_id, restaurant_id) in agents {
        roles.push(RoleMembership::Agent {
            staff_id,
            agent_id,
            restaurant_id,
        });
    }

    if let Some((customer_id,)) =
        sqlx::query_as::<_, (i64,)>("SELECT customer_id FROM customers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
    {
        roles.push(RoleMembership::Customer { customer_id });
    }

    Ok(roles)
}

/// Pick the primary role from a set of memberships by fixed priority.
///
/// A user with no memberships at all still gets the customer label, with no
/// role data attached.
pub fn primary_role(roles: &[RoleMembership]) -> (RoleKind, Option<&RoleMembership>) {
    const PRIORITY: [RoleKind; 4] = [
        RoleKind::Admin,
        RoleKind::Owner,
        RoleKind::Agent,
        RoleKind::Customer,
    ];

    for kind in PRIORITY {
        if let Some(membership) = roles.iter().find(|r| r.kind() == kind) {
            return (kind, Some(membership));
        }
    }
    (RoleKind::Customer, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> RoleMembership {
        RoleMembership::Customer { customer_id: 1 }
    }

    fn owner() -> RoleMembership {
        RoleMembership::Owner {
            staff_id: 10,
            manager_id: 5,
            restaurant_id: None,
        }
    }

    fn agent() -> RoleMembership {
        RoleMembership::Agent {
            staff_id: 11,
            agent_id: 6,
            restaurant_id: Some(2),
        }
    }

    #[test]
    fn test_priority_order() {
        let roles = vec![customer(), agent(), owner()];
        let (kind, data) = primary_role(&roles);
        assert_eq!(kind, RoleKind::Owner);
        assert_eq!(data, Some(&owner()));

        let roles = vec![customer(), agent()];
        let (kind, data) = primary_role(&roles);
        assert_eq!(kind, RoleKind::Agent);
        assert_eq!(data, Some(&agent()));

        let roles = vec![
            customer(),
            owner(),
            RoleMembership::Admin { admin_id: 1 },
        ];
        let (kind, _) = primary_role(&roles);
        assert_eq!(kind, RoleKind::Admin);
    }

    #[test]
    fn test_priority_is_order_independent() {
        let forward = vec![RoleMembership::Admin { admin_id: 1 }, customer()];
        let reversed = vec![customer(), RoleMembership::Admin { admin_id: 1 }];
        assert_eq!(primary_role(&forward).0, primary_role(&reversed).0);
    }

    #[test]
    fn test_no_memberships_defaults_to_customer() {
        let (kind, data) = primary_role(&[]);
        assert_eq!(kind, RoleKind::Customer);
        assert!(data.is_none());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(RoleKind::parse("admin"), RoleKind::Admin);
        assert_eq!(RoleKind::parse("owner"), RoleKind::Owner);
        assert_eq!(RoleKind::parse("agent"), RoleKind::Agent);
        assert_eq!(RoleKind::parse("customer"), RoleKind::Customer);
        // Unknown values fall back to customer
        assert_eq!(RoleKind::parse("superuser"), RoleKind::Customer);
        assert_eq!(RoleKind::parse(""), RoleKind::Customer);
    }

    #[test]
    fn test_membership_json_shape() {
        let json = serde_json::to_value(owner()).unwrap();
        assert_eq!(json["type"], "owner");
        assert_eq!(json["staffId"], 10);
        assert_eq!(json["managerId"], 5);
        assert!(json["restaurantId"].is_null());

        let json = serde_json::to_value(customer()).unwrap();
        assert_eq!(json["type"], "customer");
        assert_eq!(json["customerId"], 1);
    }
}
