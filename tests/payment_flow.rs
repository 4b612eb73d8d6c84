use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use globelens_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::{GoogleSignInRequest, SigninRequest},
        catalog::UpdateEngagementRequest,
        leaves::{CreateLeaveRequest, UpdateLeaveStatusRequest},
        manager::{BulkAction, BulkActionRequest},
        payments::{PaymentFormData, PaymentSuccessRequest, PaypalData},
        queries::{CreateQueryRequest, RespondQueryRequest, UpdateQueryStatusRequest},
    },
    entity::{PaymentDetails, UserAuths, UserReports, manager_auths, reports, user_reports},
    error::AppError,
    integrations::{GatewayOrder, PaymentGateway, SocialProfile, SocialVerifier},
    middleware::auth::{CustomerAuth, ManagerAuth},
    models::{QueryStatus, Role},
    services::{
        auth_service, engagement_service, leave_service, manager_service, payment_service,
        query_service, report_service, social_service,
    },
    state::AppState,
    upload::MultipartForm,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement, sea_query::Expr,
};
use tokio::sync::Mutex;
use uuid::Uuid;

// Every test truncates the same tables.
static DB_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Gateway stub: orders whose id starts with `PENDING` are not completed.
struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, AppError> {
        let status = if order_id.starts_with("PENDING") {
            "APPROVED"
        } else {
            "COMPLETED"
        };
        Ok(GatewayOrder {
            id: order_id.to_string(),
            status: status.to_string(),
            amount: Some(99.0),
            payer_email: None,
        })
    }
}

/// Accepts only the Google token `google-ok`.
struct FakeSocial;

#[async_trait]
impl SocialVerifier for FakeSocial {
    async fn verify_google(&self, id_token: &str) -> Result<SocialProfile, AppError> {
        if id_token != "google-ok" {
            return Err(AppError::unauthorized("Google authentication failed"));
        }
        Ok(SocialProfile {
            email: "Social.User@Example.com".into(),
            name: Some("Social User".into()),
            picture: None,
        })
    }

    async fn verify_facebook(&self, _access_token: &str) -> Result<SocialProfile, AppError> {
        Err(AppError::unauthorized("Facebook authentication failed"))
    }
}

fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            None
        }
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE engagements, user_reports, payment_details, addresses, customer_queries, \
         potential_customers, blogs, leaves, audit_logs, reports, categories, manager_auths, \
         user_auths RESTART IDENTITY CASCADE",
    ))
    .await?;

    let url = database_url.to_string();
    let config = AppConfig::from_lookup(move |key| match key {
        "DATABASE_URL" => Some(url.clone()),
        "JWT_SECRET" => Some("test-secret".to_string()),
        "PAYPAL_CLIENT_ID" => Some("client".to_string()),
        "PAYPAL_SECRET_KEY" => Some("secret".to_string()),
        _ => None,
    })?;

    Ok(AppState::with_integrations(
        orm,
        config,
        Arc::new(FakeGateway),
        Arc::new(FakeSocial),
    ))
}

async fn create_report(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let report = reports::ActiveModel {
        id: Set(Uuid::new_v4()),
        report_name: Set(name.into()),
        industry: Set("Healthcare".into()),
        cost: Set(99.0),
        size: Set("0.01 MB".into()),
        status: Set("active".into()),
        file_type: Set("application/pdf".into()),
        description: Set("Market sizing".into()),
        file: Set(b"%PDF-1.4 test".to_vec()),
        file_content_type: Set("application/pdf".into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;
    Ok(report.id)
}

async fn create_staff(state: &AppState, email: &str, role: Role) -> anyhow::Result<ManagerAuth> {
    let staff = manager_auths::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.into()),
        password_hash: Set("unused".into()),
        full_name: Set("Sam".into()),
        last_name: Set("Staff".into()),
        phone: Set("555-0100".into()),
        role: Set(role.as_str().into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;
    Ok(ManagerAuth {
        manager_id: staff.id,
        email: staff.email,
        role: Some(role),
        ip_address: None,
    })
}

fn checkout(email: &str, order_id: &str, report_id: Uuid) -> PaymentSuccessRequest {
    PaymentSuccessRequest {
        form_data: Some(PaymentFormData {
            full_name: "Jane Buyer".into(),
            email: email.into(),
            city: "Austin".into(),
            ..Default::default()
        }),
        paypal_data: Some(PaypalData { id: order_id.into() }),
        report_id: Some(report_id.to_string()),
    }
}

fn signup_form(email: &str) -> MultipartForm {
    MultipartForm {
        fields: HashMap::from([
            ("email".to_string(), email.to_string()),
            ("password".to_string(), "secret-pass".to_string()),
            ("fullName".to_string(), "Jane Member".to_string()),
        ]),
        files: HashMap::new(),
    }
}

/// Completes a checkout and returns the buyer's identity.
async fn buy(
    state: &AppState,
    email: &str,
    order_id: &str,
    report_id: Uuid,
) -> anyhow::Result<CustomerAuth> {
    payment_service::payment_success(state, checkout(email, order_id, report_id)).await?;
    let user = auth_service::find_by_email(&state.orm, email)
        .await?
        .expect("provisioned user");
    Ok(CustomerAuth {
        user_id: user.id,
        email: user.email,
    })
}

async fn set_entitlement(
    state: &AppState,
    customer: &CustomerAuth,
    is_active: bool,
    payment_status: &str,
) -> anyhow::Result<()> {
    UserReports::update_many()
        .col_expr(user_reports::Column::IsActive, Expr::value(is_active))
        .col_expr(user_reports::Column::PaymentStatus, Expr::value(payment_status))
        .filter(user_reports::Column::UserId.eq(customer.user_id))
        .exec(&state.orm)
        .await?;
    Ok(())
}

// Guest checkout provisions an account, repeat callbacks are idempotent, and
// the entitlement gates and counts document access.
#[tokio::test]
async fn guest_checkout_grants_access_once() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let report_id = create_report(&state, "Global Insulin Market").await?;
    let other_report = create_report(&state, "EV Batteries").await?;

    let first = payment_service::payment_success(
        &state,
        checkout("Jane@Example.com", "ORDER-1", report_id),
    )
    .await?;
    let first = first.data.expect("payment data");
    let credentials = first.credentials.expect("new account credentials");
    assert_eq!(credentials.email, "jane@example.com");
    assert_eq!(credentials.temporary_password.len(), 8);

    let repeat =
        payment_service::payment_success(&state, checkout("jane@example.com", "ORDER-1", report_id))
            .await?;
    assert_eq!(repeat.message, "Payment already processed");
    let repeat = repeat.data.expect("payment data");
    assert_eq!(repeat.payment_id, first.payment_id);
    assert!(repeat.credentials.is_none());

    // The temporary password signs the buyer in.
    let signed_in = auth_service::signin(
        &state,
        SigninRequest {
            email: "jane@example.com".into(),
            password: credentials.temporary_password,
        },
    )
    .await?;
    let user_id = signed_in.data.expect("auth data").user.id;
    let customer = CustomerAuth {
        user_id,
        email: "jane@example.com".into(),
    };

    let purchased = payment_service::purchased_reports(&state, &customer).await?;
    let purchased = purchased.data.expect("purchases");
    assert_eq!(purchased.len(), 1);
    assert_eq!(purchased[0].report.id, report_id);
    assert_eq!(purchased[0].access_count, 0);

    let grant = payment_service::verify_access(&state, &customer, report_id).await?;
    assert_eq!(grant.data.expect("grant").access_count, 1);
    let grant = payment_service::verify_access(&state, &customer, report_id).await?;
    assert_eq!(grant.data.expect("grant").access_count, 2);

    let denied = payment_service::verify_access(&state, &customer, other_report).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    // A second purchase by the same buyer reuses the account.
    let second = payment_service::payment_success(
        &state,
        checkout("jane@example.com", "ORDER-2", other_report),
    )
    .await?;
    assert!(second.data.expect("payment data").credentials.is_none());
    let purchased = payment_service::purchased_reports(&state, &customer).await?;
    assert_eq!(purchased.data.expect("purchases").len(), 2);

    Ok(())
}

#[tokio::test]
async fn incomplete_or_unknown_checkout_is_rejected() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let report_id = create_report(&state, "Cold Chain Logistics").await?;

    let pending = payment_service::payment_success(
        &state,
        checkout("buyer@example.com", "PENDING-1", report_id),
    )
    .await;
    assert!(matches!(pending, Err(AppError::PaymentIncomplete(_))));

    let missing = payment_service::payment_success(
        &state,
        checkout("buyer@example.com", "ORDER-9", Uuid::new_v4()),
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    // Nothing was recorded for either attempt.
    let payments = payment_service::payment_details(&state, Default::default()).await?;
    assert_eq!(payments.meta.and_then(|m| m.total), Some(0));

    Ok(())
}

#[tokio::test]
async fn engagement_upsert_counts_views() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let report_id = create_report(&state, "Solar Inverters").await?;
    let customer = buy(&state, "reader@example.com", "ORDER-3", report_id).await?;

    engagement_service::track(
        &state,
        &customer,
        report_id,
        UpdateEngagementRequest {
            reading_progress: Some(40),
        },
    )
    .await?;
    let engagement = engagement_service::track(
        &state,
        &customer,
        report_id,
        UpdateEngagementRequest {
            reading_progress: Some(250),
        },
    )
    .await?
    .data
    .expect("engagement");

    assert_eq!(engagement.views, 2);
    assert_eq!(engagement.reading_progress, 100);

    let missing = engagement_service::track(
        &state,
        &customer,
        Uuid::new_v4(),
        UpdateEngagementRequest {
            reading_progress: None,
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn employees_cannot_use_manager_operations() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let manager = create_staff(&state, "boss@example.com", Role::Manager).await?;
    let employee = create_staff(&state, "worker@example.com", Role::Employee).await?;

    let team = manager_service::list_team(&state, &employee).await;
    assert!(matches!(team, Err(AppError::Forbidden(_))));

    let from = Utc::now() + Duration::days(7);
    let leave = leave_service::apply(
        &state,
        &employee,
        CreateLeaveRequest {
            full_name: None,
            email: None,
            phone: None,
            from_date: from,
            to_date: from + Duration::days(2),
            reason: "Family visit".into(),
        },
    )
    .await?
    .data
    .expect("leave");
    assert_eq!(leave.full_name, "Sam Staff");
    assert_eq!(leave.email, "worker@example.com");

    let self_review = leave_service::update_status(
        &state,
        &employee,
        leave.id,
        UpdateLeaveStatusRequest {
            status: "approved".into(),
            comments: None,
        },
    )
    .await;
    assert!(matches!(self_review, Err(AppError::Forbidden(_))));

    let peek = leave_service::employee_leaves(&state, &employee, manager.manager_id).await;
    assert!(matches!(peek, Err(AppError::Forbidden(_))));

    let approved = leave_service::update_status(
        &state,
        &manager,
        leave.id,
        UpdateLeaveStatusRequest {
            status: "approved".into(),
            comments: Some("Enjoy".into()),
        },
    )
    .await?;
    assert_eq!(approved.message, "Leave approved");

    let team = manager_service::list_team(&state, &manager).await?;
    assert_eq!(team.data.expect("team").len(), 2);

    Ok(())
}

#[tokio::test]
async fn google_sign_in_provisions_account_once() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;

    let rejected = social_service::google_sign_in(
        &state,
        GoogleSignInRequest {
            token: "forged".into(),
        },
    )
    .await;
    assert!(matches!(rejected, Err(AppError::Unauthorized(_))));

    let first = social_service::google_sign_in(
        &state,
        GoogleSignInRequest {
            token: "google-ok".into(),
        },
    )
    .await?
    .data
    .expect("auth data");
    assert_eq!(first.user.email, "social.user@example.com");
    assert_eq!(first.user.full_name, "Social User");

    let second = social_service::google_sign_in(
        &state,
        GoogleSignInRequest {
            token: "google-ok".into(),
        },
    )
    .await?
    .data
    .expect("auth data");
    assert_eq!(second.user.id, first.user.id);

    let claims = state
        .tokens
        .verify(&second.token, globelens_api::auth::TokenKind::Access)?;
    assert_eq!(claims.user_id, first.user.id);
    assert!(claims.role.is_none());

    Ok(())
}

#[tokio::test]
async fn duplicate_signup_is_rejected_without_a_second_account() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;

    let created = auth_service::signup(&state, signup_form("jane@example.com"))
        .await?
        .data
        .expect("auth data");
    assert_eq!(created.user.email, "jane@example.com");
    assert!(!created.token.is_empty());

    let err = auth_service::signup(&state, signup_form(" JANE@Example.com "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(UserAuths::find().count(&state.orm).await?, 1);

    Ok(())
}

// Access needs an active entitlement whose payment completed; denied
// attempts leave the counter alone.
#[tokio::test]
async fn inactive_or_unpaid_entitlements_deny_access() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let report_id = create_report(&state, "Aquaculture Feed").await?;
    let customer = buy(&state, "fish@example.com", "ORDER-4", report_id).await?;

    let grant = payment_service::verify_access(&state, &customer, report_id).await?;
    assert_eq!(grant.data.expect("grant").access_count, 1);

    set_entitlement(&state, &customer, false, "completed").await?;
    let denied = payment_service::verify_access(&state, &customer, report_id).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    let purchased = payment_service::purchased_reports(&state, &customer).await?;
    assert!(purchased.data.expect("purchases").is_empty());

    set_entitlement(&state, &customer, true, "failed").await?;
    let denied = payment_service::verify_access(&state, &customer, report_id).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    set_entitlement(&state, &customer, true, "pending").await?;
    let denied = payment_service::verify_access(&state, &customer, report_id).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    set_entitlement(&state, &customer, true, "completed").await?;
    let grant = payment_service::verify_access(&state, &customer, report_id).await?;
    assert_eq!(grant.data.expect("grant").access_count, 2);

    Ok(())
}

// Sold reports and paying users stay in place so payment records survive.
#[tokio::test]
async fn purchase_history_blocks_deletes() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let manager = create_staff(&state, "boss@example.com", Role::Manager).await?;
    let report_id = create_report(&state, "Vertical Farming").await?;
    let buyer = buy(&state, "grower@example.com", "ORDER-5", report_id).await?;

    let err = report_service::delete_report(&state, &manager, report_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    report_service::get_report(&state, report_id).await?;

    let err = manager_service::delete_user(&state, &manager, buyer.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = manager_service::bulk_action(
        &state,
        &manager,
        BulkActionRequest {
            user_ids: vec![buyer.user_id],
            action: BulkAction::Delete,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(PaymentDetails::find().count(&state.orm).await?, 1);
    let purchased = payment_service::purchased_reports(&state, &buyer).await?;
    assert_eq!(purchased.data.expect("purchases").len(), 1);

    // Accounts without purchases can still be removed.
    let browser = auth_service::signup(&state, signup_form("browser@example.com"))
        .await?
        .data
        .expect("auth data");
    manager_service::delete_user(&state, &manager, browser.user.id).await?;
    assert_eq!(UserAuths::find().count(&state.orm).await?, 1);

    Ok(())
}

#[tokio::test]
async fn support_query_moves_through_staff_workflow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let staff = create_staff(&state, "support@example.com", Role::Employee).await?;
    let member = auth_service::signup(&state, signup_form("asker@example.com"))
        .await?
        .data
        .expect("auth data");
    let customer = CustomerAuth {
        user_id: member.user.id,
        email: member.user.email,
    };

    let blank = query_service::create_query(
        &state,
        &customer,
        CreateQueryRequest {
            subject: " ".into(),
            message: "Hello".into(),
            priority: None,
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::Validation(_))));

    let query = query_service::create_query(
        &state,
        &customer,
        CreateQueryRequest {
            subject: "Invoice copy".into(),
            message: "Please resend my invoice".into(),
            priority: None,
        },
    )
    .await?
    .data
    .expect("query");
    assert_eq!(query.status, "pending");
    assert_eq!(query.priority, "medium");
    assert!(query.responded_at.is_none());

    let mine = query_service::user_queries(&state, &customer).await?;
    let mine = mine.data.expect("queries");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, query.id);

    let empty = query_service::respond(
        &state,
        &staff,
        query.id,
        RespondQueryRequest {
            response: "   ".into(),
        },
    )
    .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));

    let answered = query_service::respond(
        &state,
        &staff,
        query.id,
        RespondQueryRequest {
            response: "Sent again".into(),
        },
    )
    .await?
    .data
    .expect("query");
    assert_eq!(answered.status, "in-progress");
    assert_eq!(answered.manager_response.as_deref(), Some("Sent again"));
    assert_eq!(answered.responded_by, Some(staff.manager_id));
    assert!(answered.responded_at.is_some());

    for status in [QueryStatus::Resolved, QueryStatus::Pending] {
        let updated = query_service::update_status(
            &state,
            &staff,
            query.id,
            UpdateQueryStatusRequest { status },
        )
        .await?
        .data
        .expect("query");
        assert_eq!(updated.status, status.as_str());
    }

    let all = query_service::all_queries(&state, Default::default())
        .await?
        .data
        .expect("queries");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].query.status, "pending");
    assert_eq!(
        all[0].user.as_ref().map(|u| u.email.as_str()),
        Some("asker@example.com")
    );

    let missing = query_service::respond(
        &state,
        &staff,
        Uuid::new_v4(),
        RespondQueryRequest {
            response: "Hello".into(),
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}
