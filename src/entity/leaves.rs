use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub employee_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub from_date: DateTimeWithTimeZone,
    pub to_date: DateTimeWithTimeZone,
    pub reason: String,
    pub status: String,
    pub applied_date: DateTimeWithTimeZone,
    pub response_date: Option<DateTimeWithTimeZone>,
    pub response_by: Option<Uuid>,
    pub comments: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::manager_auths::Entity",
        from = "Column::EmployeeId",
        to = "super::manager_auths::Column::Id"
    )]
    ManagerAuths,
}

impl Related<super::manager_auths::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagerAuths.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
