use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub locality: Option<String>,
    pub city: Option<String>,
    pub pin_code: Option<String>,
    pub country: Option<String>,
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
