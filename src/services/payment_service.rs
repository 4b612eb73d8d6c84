use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use crate::{
    auth::password,
    dto::payments::{
        AccessGrant, Credentials, PaymentDetailView, PaymentFormData, PaymentSuccessRequest,
        PaymentSuccessResponse, PurchasedReport, UserReportView,
    },
    entity::{
        PaymentDetails, Reports, UserAuths, UserReports, payment_details, user_auths,
        user_reports,
    },
    error::{AppError, AppResult},
    integrations::{GatewayOrder, is_valid_order_id},
    middleware::auth::CustomerAuth,
    models::{Entitlement, PaymentRecord, PaymentStatus, Report, ReportRef, UserRef},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    validation::is_valid_email,
};

const CREDENTIALS_NOTE: &str = "Please login with these credentials and change your password";

struct Checkout {
    form: PaymentFormData,
    order_id: String,
    report_id: String,
}

fn validate_request(payload: PaymentSuccessRequest) -> AppResult<Checkout> {
    let (form, paypal, report_id) = match (payload.form_data, payload.paypal_data, payload.report_id)
    {
        (Some(form), Some(paypal), Some(report_id))
            if !paypal.id.trim().is_empty() && !report_id.trim().is_empty() =>
        {
            (form, paypal, report_id)
        }
        _ => return Err(AppError::validation("Invalid payment data")),
    };
    if !is_valid_order_id(paypal.id.trim()) {
        return Err(AppError::validation("Invalid payment data"));
    }

    let mut form = form;
    form.email = form.email.trim().to_lowercase();
    if !is_valid_email(&form.email) {
        return Err(AppError::validation("Invalid email address"));
    }

    Ok(Checkout {
        form,
        order_id: paypal.id.trim().to_string(),
        report_id: report_id.trim().to_string(),
    })
}

async fn existing_payment(
    state: &AppState,
    order_id: &str,
) -> AppResult<Option<PaymentSuccessResponse>> {
    let payment = PaymentDetails::find()
        .filter(payment_details::Column::TransactionId.eq(order_id))
        .one(&state.orm)
        .await?;
    let payment = match payment {
        Some(p) => p,
        None => return Ok(None),
    };

    let entitlement = UserReports::find()
        .filter(user_reports::Column::UserId.eq(payment.user_id))
        .filter(user_reports::Column::ReportId.eq(payment.report_id))
        .one(&state.orm)
        .await?;
    let entitlement = match entitlement {
        Some(e) => e,
        None => return Err(AppError::Internal(anyhow::anyhow!(
            "payment {} has no entitlement",
            payment.id
        ))),
    };

    Ok(Some(PaymentSuccessResponse {
        payment_id: payment.id,
        user_report_id: entitlement.id,
        credentials: None,
    }))
}

/// Resolves the buyer by email, provisioning an account with a temporary
/// password when none exists. The password is only returned here.
async fn resolve_buyer(
    txn: &DatabaseTransaction,
    form: &PaymentFormData,
) -> AppResult<(user_auths::Model, Option<Credentials>)> {
    let existing = UserAuths::find()
        .filter(user_auths::Column::Email.eq(form.email.as_str()))
        .one(txn)
        .await?;
    if let Some(user) = existing {
        return Ok((user, None));
    }

    let temporary_password = password::generate_temp_password();
    let full_name = if form.full_name.trim().is_empty() {
        form.email.clone()
    } else {
        form.full_name.trim().to_string()
    };
    let non_empty = |v: &str| (!v.trim().is_empty()).then(|| v.trim().to_string());

    let user = user_auths::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(form.email.clone()),
        password_hash: Set(password::hash_password(&temporary_password)?),
        full_name: Set(full_name),
        phone: Set(non_empty(&form.phone)),
        address_line1: Set(non_empty(&form.address_line1)),
        address_line2: Set(form.address_line2.as_deref().and_then(non_empty)),
        city: Set(non_empty(&form.city)),
        state: Set(non_empty(&form.state)),
        zip_code: Set(non_empty(&form.zip_code)),
        country: Set(non_empty(&form.country)),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    tracing::info!(user_id = %user.id, "account provisioned from payment");
    let credentials = Credentials {
        email: user.email.clone(),
        temporary_password,
        message: CREDENTIALS_NOTE.to_string(),
    };
    Ok((user, Some(credentials)))
}

async fn record_purchase(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    report: &Report,
    order: &GatewayOrder,
    form: &PaymentFormData,
) -> AppResult<(payment_details::Model, user_reports::Model)> {
    let now = Utc::now().fixed_offset();

    let payment = payment_details::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        report_id: Set(report.id),
        transaction_id: Set(order.id.clone()),
        paypal_order_id: Set(Some(order.id.clone())),
        amount: Set(order.amount.unwrap_or(report.cost)),
        payment_status: Set(PaymentStatus::Completed.as_str().to_string()),
        payment_date: Set(now),
        full_name: Set(form.full_name.clone()),
        email: Set(form.email.clone()),
        phone: Set(form.phone.clone()),
        address_line1: Set(form.address_line1.clone()),
        address_line2: Set(form.address_line2.clone()),
        city: Set(form.city.clone()),
        state: Set(form.state.clone()),
        zip_code: Set(form.zip_code.clone()),
        country: Set(form.country.clone()),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(|e| AppError::unique_violation(e, "Payment already recorded"))?;

    let entitlement = user_reports::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        report_id: Set(report.id),
        purchase_date: Set(now),
        transaction_id: Set(order.id.clone()),
        last_access_date: Set(now),
        payment_status: Set(PaymentStatus::Completed.as_str().to_string()),
        is_active: Set(true),
        ..Default::default()
    };
    let entitlement = UserReports::insert(entitlement)
        .on_conflict(
            OnConflict::columns([user_reports::Column::UserId, user_reports::Column::ReportId])
                .update_columns([
                    user_reports::Column::PaymentStatus,
                    user_reports::Column::IsActive,
                    user_reports::Column::PurchaseDate,
                    user_reports::Column::TransactionId,
                    user_reports::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(txn)
        .await?;

    Ok((payment, entitlement))
}

pub async fn payment_success(
    state: &AppState,
    payload: PaymentSuccessRequest,
) -> AppResult<ApiResponse<PaymentSuccessResponse>> {
    let checkout = validate_request(payload)?;

    if let Some(existing) = existing_payment(state, &checkout.order_id).await? {
        tracing::info!(order_id = %checkout.order_id, "payment already recorded");
        return Ok(ApiResponse::success(
            "Payment already processed",
            existing,
            None,
        ));
    }

    let order = state.payments.fetch_order(&checkout.order_id).await?;
    if !order.is_completed() {
        tracing::warn!(order_id = %order.id, status = %order.status, "payment not completed");
        return Err(AppError::PaymentIncomplete("Payment not completed".into()));
    }
    if let Some(payer) = order.payer_email.as_deref() {
        if !payer.eq_ignore_ascii_case(&checkout.form.email) {
            tracing::debug!(order_id = %order.id, payer, "payer email differs from checkout form");
        }
    }

    let report_id = Uuid::parse_str(&checkout.report_id)
        .map_err(|_| AppError::validation("Invalid reportId"))?;
    let report = Reports::find_by_id(report_id)
        .select_only()
        .columns(Report::COLUMNS)
        .into_model::<Report>()
        .one(&state.orm)
        .await?;
    let report = match report {
        Some(r) => r,
        None => return Err(AppError::not_found("Report not found")),
    };

    let txn = state.orm.begin().await?;
    let (user, credentials) = resolve_buyer(&txn, &checkout.form).await?;
    let (payment, entitlement) =
        record_purchase(&txn, user.id, &report, &order, &checkout.form).await?;
    txn.commit().await?;

    tracing::info!(
        payment_id = %payment.id,
        user_id = %user.id,
        report_id = %report.id,
        "payment recorded"
    );

    Ok(ApiResponse::success(
        "Payment processed successfully",
        PaymentSuccessResponse {
            payment_id: payment.id,
            user_report_id: entitlement.id,
            credentials,
        },
        None,
    ))
}

async fn report_map(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, Report>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let reports = Reports::find()
        .filter(crate::entity::reports::Column::Id.is_in(ids))
        .select_only()
        .columns(Report::COLUMNS)
        .into_model::<Report>()
        .all(&state.orm)
        .await?;
    Ok(reports.into_iter().map(|r| (r.id, r)).collect())
}

async fn report_refs(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, ReportRef>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let refs = Reports::find()
        .filter(crate::entity::reports::Column::Id.is_in(ids))
        .select_only()
        .columns(ReportRef::COLUMNS)
        .into_model::<ReportRef>()
        .all(&state.orm)
        .await?;
    Ok(refs.into_iter().map(|r| (r.id, r)).collect())
}

pub(crate) async fn user_refs(
    state: &AppState,
    ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, UserRef>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let refs = UserAuths::find()
        .filter(user_auths::Column::Id.is_in(ids))
        .select_only()
        .columns(UserRef::COLUMNS)
        .into_model::<UserRef>()
        .all(&state.orm)
        .await?;
    Ok(refs.into_iter().map(|u| (u.id, u)).collect())
}

pub async fn purchased_reports(
    state: &AppState,
    customer: &CustomerAuth,
) -> AppResult<ApiResponse<Vec<PurchasedReport>>> {
    let entitlements = UserReports::find()
        .filter(user_reports::Column::UserId.eq(customer.user_id))
        .filter(user_reports::Column::IsActive.eq(true))
        .filter(user_reports::Column::PaymentStatus.eq(PaymentStatus::Completed.as_str()))
        .order_by_desc(user_reports::Column::PurchaseDate)
        .all(&state.orm)
        .await?;

    let mut reports = report_map(state, entitlements.iter().map(|e| e.report_id).collect()).await?;
    let items: Vec<PurchasedReport> = entitlements
        .into_iter()
        .filter_map(|e| {
            let report = reports.remove(&e.report_id)?;
            Some(PurchasedReport {
                id: e.id,
                report,
                purchase_date: e.purchase_date.with_timezone(&Utc),
                last_access_date: e.last_access_date.with_timezone(&Utc),
                access_count: e.access_count,
                payment_status: e.payment_status,
                is_active: e.is_active,
                transaction_id: e.transaction_id,
            })
        })
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Purchased reports",
        items,
        Some(Meta::total(total)),
    ))
}

/// Counts one access against an accessible entitlement in a single UPDATE.
pub async fn verify_access(
    state: &AppState,
    customer: &CustomerAuth,
    report_id: Uuid,
) -> AppResult<ApiResponse<AccessGrant>> {
    let updated = UserReports::update_many()
        .col_expr(
            user_reports::Column::AccessCount,
            Expr::col(user_reports::Column::AccessCount).add(1),
        )
        .col_expr(
            user_reports::Column::LastAccessDate,
            Expr::value(Utc::now().fixed_offset()),
        )
        .filter(user_reports::Column::UserId.eq(customer.user_id))
        .filter(user_reports::Column::ReportId.eq(report_id))
        .filter(user_reports::Column::IsActive.eq(true))
        .filter(user_reports::Column::PaymentStatus.eq(PaymentStatus::Completed.as_str()))
        .exec_with_returning(&state.orm)
        .await?;

    let entitlement = match updated.into_iter().next() {
        Some(e) => e,
        None => return Err(AppError::forbidden("Access denied")),
    };

    Ok(ApiResponse::success(
        "Access granted",
        AccessGrant {
            report_id: entitlement.report_id,
            access_count: entitlement.access_count,
            last_access_date: entitlement.last_access_date.with_timezone(&Utc),
        },
        None,
    ))
}

pub async fn payment_details(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<Vec<PaymentDetailView>>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = PaymentDetails::find().order_by_desc(payment_details::Column::PaymentDate);
    let total = finder.clone().count(&state.orm).await? as i64;
    let payments = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let users = user_refs(state, payments.iter().map(|p| p.user_id).collect()).await?;
    let reports = report_refs(state, payments.iter().map(|p| p.report_id).collect()).await?;
    let items = payments
        .into_iter()
        .map(|p| PaymentDetailView {
            user: users.get(&p.user_id).cloned(),
            report: reports.get(&p.report_id).cloned(),
            payment: PaymentRecord::from(p),
        })
        .collect();

    Ok(ApiResponse::success(
        "Payment details",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn user_reports(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<Vec<UserReportView>>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = UserReports::find().order_by_desc(user_reports::Column::PurchaseDate);
    let total = finder.clone().count(&state.orm).await? as i64;
    let entitlements = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let users = user_refs(state, entitlements.iter().map(|e| e.user_id).collect()).await?;
    let reports = report_refs(state, entitlements.iter().map(|e| e.report_id).collect()).await?;
    let items = entitlements
        .into_iter()
        .map(|e| UserReportView {
            user: users.get(&e.user_id).cloned(),
            report: reports.get(&e.report_id).cloned(),
            entitlement: Entitlement::from(e),
        })
        .collect();

    Ok(ApiResponse::success(
        "User reports",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::payments::PaypalData;

    fn request(email: &str) -> PaymentSuccessRequest {
        PaymentSuccessRequest {
            form_data: Some(PaymentFormData {
                full_name: "Jane Doe".into(),
                email: email.into(),
                ..Default::default()
            }),
            paypal_data: Some(PaypalData { id: "ORDER-1".into() }),
            report_id: Some(Uuid::new_v4().to_string()),
        }
    }

    #[test]
    fn missing_parts_are_rejected() {
        let mut req = request("jane@example.com");
        req.paypal_data = None;
        let err = validate_request(req).err().unwrap();
        assert_eq!(err.to_string(), "Invalid payment data");

        let mut req = request("jane@example.com");
        req.paypal_data = Some(PaypalData { id: "  ".into() });
        assert!(validate_request(req).is_err());
    }

    #[test]
    fn order_ids_with_path_characters_are_rejected() {
        for id in ["../v1/oauth2/token", "ORDER-1/capture", "ORDER 1"] {
            let mut req = request("jane@example.com");
            req.paypal_data = Some(PaypalData { id: id.into() });
            let err = validate_request(req).err().unwrap();
            assert_eq!(err.to_string(), "Invalid payment data");
        }
    }

    #[test]
    fn email_is_checked_and_lowercased() {
        let err = validate_request(request("not-an-email")).err().unwrap();
        assert_eq!(err.to_string(), "Invalid email address");

        let checkout = validate_request(request(" Jane@Example.COM ")).unwrap();
        assert_eq!(checkout.form.email, "jane@example.com");
        assert_eq!(checkout.order_id, "ORDER-1");
    }
}
