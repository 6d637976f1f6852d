//! Transactional multi-table registration
//!
//! Either every row for a registration lands (user, account, role rows) or
//! none do. The transaction rolls back on drop if any insert fails. Which
//! role rows a registration creates is decided up front by [`row_plan`].

use crate::db::roles::RoleKind;
use sqlx::{PgPool, Postgres, Transaction};

pub struct NewRegistration {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub role: RoleKind,
}

/// Staff record plus its specialization link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffPlan {
    /// Staff row tagged MANAGER, linked from restaurant_managers
    Manager,
    /// Staff row tagged DELIVERY, linked from delivery_agents
    Delivery,
}

impl StaffPlan {
    pub fn staff_role(self) -> &'static str {
        match self {
            StaffPlan::Manager => "MANAGER",
            StaffPlan::Delivery => "DELIVERY",
        }
    }
}

/// The role rows a registration creates beyond the user and account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPlan {
    pub customer: bool,
    pub admin: bool,
    pub staff: Option<StaffPlan>,
}

/// Decide the role rows for a requested role.
///
/// Every role except admin also gets a customer row; owner and agent add a
/// staff record with its specialization link.
pub fn row_plan(role: RoleKind) -> RowPlan {
    match role {
        RoleKind::Customer => RowPlan {
            customer: true,
            admin: false,
            staff: None,
        },
        RoleKind::Admin => RowPlan {
            customer: false,
            admin: true,
            staff: None,
        },
        RoleKind::Owner => RowPlan {
            customer: true,
            admin: false,
            staff: Some(StaffPlan::Manager),
        },
        RoleKind::Agent => RowPlan {
            customer: true,
            admin: false,
            staff: Some(StaffPlan::Delivery),
        },
    }
}

/// Create all rows for a registration inside one transaction and return the
/// new user id.
///
/// A duplicate email surfaces as a unique violation; callers translate that
/// into a conflict error (see [`is_unique_violation`]).
pub async fn create(pool: &PgPool, reg: &NewRegistration) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (user_id,): (i64,) = sqlx::query_as(
        "INSERT INTO users (name, phone_number, email) VALUES ($1, $2, $3) RETURNING user_id",
    )
    .bind(&reg.name)
    .bind(&reg.phone)
    .bind(&reg.email)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO accounts (user_id, phone_number, password) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(&reg.phone)
        .bind(&reg.password_hash)
        .execute(&mut *tx)
        .await?;

    let plan = row_plan(reg.role);

    if plan.customer {
        sqlx::query("INSERT INTO customers (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    if plan.admin {
        sqlx::query("INSERT INTO admins (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    if let Some(staff) = plan.staff {
        let staff_id = insert_staff(&mut tx, user_id, staff.staff_role()).await?;
        let link = match staff {
            StaffPlan::Manager => "INSERT INTO restaurant_managers (staff_id) VALUES ($1)",
            StaffPlan::Delivery => "INSERT INTO delivery_agents (staff_id) VALUES ($1)",
        };
        sqlx::query(link).bind(staff_id).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(user_id)
}

/// Insert a staff row with no restaurant assigned yet, hired today.
async fn insert_staff(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    staff_role: &str,
) -> Result<i64, sqlx::Error> {
    let (staff_id,): (i64,) = sqlx::query_as(
        "INSERT INTO restaurant_staff (user_id, restaurant_id, role, date_hired, status)
            VALUES ($1, NULL, $2, CURRENT_DATE, 'ACTIVE')
            RETURNING staff_id",
    )
    .bind(user_id)
    .bind(staff_role)
    .fetch_one(&mut **tx)
    .await?;
    Ok(staff_id)
}

/// Whether a database error is a unique-constraint violation (duplicate
/// email on the users table).
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_plan() {
        assert_eq!(
            row_plan(RoleKind::Customer),
            RowPlan {
                customer: true,
                admin: false,
                staff: None,
            }
        );
    }

    #[test]
    fn test_admin_plan_has_no_customer_row() {
        assert_eq!(
            row_plan(RoleKind::Admin),
            RowPlan {
                customer: false,
                admin: true,
                staff: None,
            }
        );
    }

    #[test]
    fn test_owner_plan() {
        let plan = row_plan(RoleKind::Owner);
        assert!(plan.customer);
        assert!(!plan.admin);
        assert_eq!(plan.staff, Some(StaffPlan::Manager));
        assert_eq!(StaffPlan::Manager.staff_role(), "MANAGER");
    }

    #[test]
    fn test_agent_plan() {
        let plan = row_plan(RoleKind::Agent);
        assert!(plan.customer);
        assert!(!plan.admin);
        assert_eq!(plan.staff, Some(StaffPlan::Delivery));
        assert_eq!(StaffPlan::Delivery.staff_role(), "DELIVERY");
    }

    #[test]
    fn test_only_admin_plan_creates_admin_row() {
        for role in [RoleKind::Customer, RoleKind::Owner, RoleKind::Agent] {
            assert!(!row_plan(role).admin);
        }
    }
}
