pub mod addresses;
pub mod audit_logs;
pub mod blogs;
pub mod categories;
pub mod customer_queries;
pub mod engagements;
pub mod leaves;
pub mod manager_auths;
pub mod payment_details;
pub mod potential_customers;
pub mod reports;
pub mod user_auths;
pub mod user_reports;

pub use addresses::Entity as Addresses;
pub use audit_logs::Entity as AuditLogs;
pub use blogs::Entity as Blogs;
pub use categories::Entity as Categories;
pub use customer_queries::Entity as CustomerQueries;
pub use engagements::Entity as Engagements;
pub use leaves::Entity as Leaves;
pub use manager_auths::Entity as ManagerAuths;
pub use payment_details::Entity as PaymentDetails;
pub use potential_customers::Entity as PotentialCustomers;
pub use reports::Entity as Reports;
pub use user_auths::Entity as UserAuths;
pub use user_reports::Entity as UserReports;
