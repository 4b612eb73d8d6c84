use sea_orm::entity::prelude::*;

use crate::models::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: Uuid,
    pub purchase_date: DateTimeWithTimeZone,
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub last_access_date: DateTimeWithTimeZone,
    pub payment_status: String,
    pub access_count: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// An entitlement grants access only while active and fully paid.
    pub fn can_access(&self) -> bool {
        self.is_active && self.payment_status == PaymentStatus::Completed.as_str()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_auths::Entity",
        from = "Column::UserId",
        to = "super::user_auths::Column::Id"
    )]
    UserAuths,
    #[sea_orm(
        belongs_to = "super::reports::Entity",
        from = "Column::ReportId",
        to = "super::reports::Column::Id"
    )]
    Reports,
}

impl Related<super::user_auths::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAuths.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn entitlement(is_active: bool, status: PaymentStatus) -> Model {
        let now = Utc::now().fixed_offset();
        Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            report_id: Uuid::new_v4(),
            purchase_date: now,
            transaction_id: "ORDER-1".into(),
            last_access_date: now,
            payment_status: status.as_str().into(),
            access_count: 0,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn access_requires_active_and_completed() {
        assert!(entitlement(true, PaymentStatus::Completed).can_access());
        assert!(!entitlement(false, PaymentStatus::Completed).can_access());
        assert!(!entitlement(true, PaymentStatus::Pending).can_access());
        assert!(!entitlement(true, PaymentStatus::Failed).can_access());
        assert!(!entitlement(false, PaymentStatus::Pending).can_access());
    }
}
