use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            AuthResponse, ChangePasswordRequest, FacebookSignInRequest, ForgotPasswordRequest,
            ForgotPasswordResponse, GoogleSignInRequest, PhotoForm, ResetPasswordRequest,
            SigninRequest, SignupForm, UpdateProfileRequest,
        },
        catalog::{CreateAddressRequest, CreateCategoryRequest, UpdateEngagementRequest},
        content::{BlogForm, CreatePotentialCustomerRequest},
        leaves::{CreateLeaveRequest, UpdateLeaveStatusRequest},
        manager::{
            BulkAction, BulkActionRequest, BulkActionResult, CreateUserRequest,
            ManagerAuthResponse, ManagerLoginRequest, ManagerProfileForm, ManagerRegisterForm,
            UpdateRoleRequest, UpdateUserStatusRequest,
        },
        payments::{
            AccessGrant, Credentials, PaymentDetailView, PaymentFormData, PaymentSuccessRequest,
            PaymentSuccessResponse, PaypalData, PurchasedReport, UserReportView,
        },
        queries::{CreateQueryRequest, QueryWithUser, RespondQueryRequest, UpdateQueryStatusRequest},
        reports::{PreviewMetadata, ReportForm, ReportPreview},
    },
    error::ErrorData,
    models::{
        Address, AuditLog, Blog, BlogAuthor, BlogBlock, BlogBlockKind, BlogThumbnail, Category,
        CustomerQuery, Engagement, Entitlement, Leave, LeaveStatus, Manager, PaymentRecord,
        PaymentStatus, PotentialCustomer, QueryPriority, QueryStatus, Report, ReportRef,
        ReportStatus, Role, User, UserRef,
    },
    preview::PreviewSection,
    response::{ApiResponse, Meta},
    routes::{
        addresses, auth, blogs, categories, engagements, health, leads, leaves, manager, params,
        payments, queries, reports,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::signin,
        auth::logout,
        auth::me,
        auth::update_profile,
        auth::update_photo,
        auth::change_password,
        auth::forgot_password,
        auth::reset_password,
        auth::google,
        auth::facebook,
        manager::register,
        manager::login,
        manager::profile,
        manager::update_profile,
        manager::forgot_password,
        manager::reset_password,
        manager::list_team,
        manager::update_team_role,
        manager::list_users,
        manager::create_user,
        manager::update_user_status,
        manager::delete_user,
        manager::bulk_action,
        manager::list_audit_logs,
        reports::list_reports,
        reports::list_by_industry,
        reports::get_report,
        reports::create_report,
        reports::update_report,
        reports::delete_report,
        reports::thumbnail,
        reports::download,
        reports::sample_pdf,
        reports::view,
        reports::preview,
        payments::payment_success,
        payments::purchased_reports,
        payments::verify_access,
        payments::payment_details,
        payments::user_reports,
        queries::create_query,
        queries::user_queries,
        queries::all_queries,
        queries::update_status,
        queries::respond,
        queries::delete_query,
        blogs::list_blogs,
        blogs::get_blog,
        blogs::thumbnail,
        blogs::create_blog,
        blogs::update_blog,
        blogs::delete_blog,
        leaves::apply,
        leaves::employee_leaves,
        leaves::all_leaves,
        leaves::update_status,
        leads::create_lead,
        leads::list_leads,
        categories::list_categories,
        categories::create_category,
        categories::delete_category,
        addresses::list_addresses,
        addresses::create_address,
        addresses::delete_address,
        engagements::track,
        engagements::list_engagements
    ),
    components(
        schemas(
            User,
            Manager,
            Report,
            ReportRef,
            UserRef,
            PaymentRecord,
            Entitlement,
            CustomerQuery,
            PotentialCustomer,
            Blog,
            BlogBlock,
            BlogBlockKind,
            BlogAuthor,
            BlogThumbnail,
            Leave,
            Address,
            AuditLog,
            Category,
            Engagement,
            Role,
            ReportStatus,
            PaymentStatus,
            QueryStatus,
            QueryPriority,
            LeaveStatus,
            SigninRequest,
            SignupForm,
            PhotoForm,
            AuthResponse,
            UpdateProfileRequest,
            ChangePasswordRequest,
            ForgotPasswordRequest,
            ForgotPasswordResponse,
            ResetPasswordRequest,
            GoogleSignInRequest,
            FacebookSignInRequest,
            ManagerLoginRequest,
            ManagerAuthResponse,
            ManagerRegisterForm,
            ManagerProfileForm,
            UpdateRoleRequest,
            CreateUserRequest,
            UpdateUserStatusRequest,
            BulkAction,
            BulkActionRequest,
            BulkActionResult,
            ReportForm,
            ReportPreview,
            PreviewMetadata,
            PreviewSection,
            PaymentFormData,
            PaypalData,
            PaymentSuccessRequest,
            PaymentSuccessResponse,
            Credentials,
            PurchasedReport,
            AccessGrant,
            PaymentDetailView,
            UserReportView,
            CreateQueryRequest,
            UpdateQueryStatusRequest,
            RespondQueryRequest,
            QueryWithUser,
            BlogForm,
            CreatePotentialCustomerRequest,
            CreateLeaveRequest,
            UpdateLeaveStatusRequest,
            CreateCategoryRequest,
            CreateAddressRequest,
            UpdateEngagementRequest,
            params::Pagination,
            params::ReportListQuery,
            params::AuditLogQuery,
            params::SortOrder,
            params::ReportSortBy,
            ErrorData,
            Meta,
            ApiResponse<ErrorData>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Customer accounts"),
        (name = "Manager", description = "Staff accounts and administration"),
        (name = "Reports", description = "Report catalog and documents"),
        (name = "Payments", description = "Checkout and entitlements"),
        (name = "Queries", description = "Customer support tickets"),
        (name = "Blogs", description = "Blog posts"),
        (name = "Leaves", description = "Staff leave requests"),
        (name = "Leads", description = "Potential customers"),
        (name = "Categories", description = "Report categories"),
        (name = "Addresses", description = "Customer addresses"),
        (name = "Engagements", description = "Reading analytics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_core_paths_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/auth/signin",
            "/api/reports/{id}/preview",
            "/api/payment-success",
            "/api/verify-access/{report_id}",
            "/api/leaves/{leave_id}/status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
