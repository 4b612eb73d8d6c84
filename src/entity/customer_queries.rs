use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customer_queries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub manager_response: Option<String>,
    pub responded_at: Option<DateTimeWithTimeZone>,
    pub responded_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_auths::Entity",
        from = "Column::UserId",
        to = "super::user_auths::Column::Id"
    )]
    UserAuths,
}

impl Related<super::user_auths::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAuths.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
