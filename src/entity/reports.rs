use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub serial_number: Option<String>,
    pub report_name: String,
    pub industry: String,
    pub cost: f64,
    pub size: String,
    pub status: String,
    pub file_type: String,
    pub description: String,
    pub file: Vec<u8>,
    pub file_content_type: String,
    pub thumbnail: Option<Vec<u8>>,
    pub thumbnail_type: Option<String>,
    pub sample_pdf: Option<Vec<u8>>,
    pub sample_pdf_type: Option<String>,
    pub upload_date: DateTimeWithTimeZone,
    pub last_modified: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_reports::Entity")]
    UserReports,
    #[sea_orm(has_many = "super::payment_details::Entity")]
    PaymentDetails,
}

impl Related<super::user_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserReports.def()
    }
}

impl Related<super::payment_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
