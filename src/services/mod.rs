pub mod address_service;
pub mod auth_service;
pub mod blog_service;
pub mod category_service;
pub mod engagement_service;
pub mod lead_service;
pub mod leave_service;
pub mod manager_service;
pub mod payment_service;
pub mod query_service;
pub mod report_service;
pub mod social_service;
