use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, Condition, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    audit::record,
    dto::reports::{PreviewMetadata, ReportPreview},
    entity::{
        Reports,
        reports::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::ManagerAuth,
    models::{Report, ReportStatus},
    preview::{extract_pdf, split_into_sections},
    response::{ApiResponse, Meta},
    routes::params::{ReportListQuery, ReportSortBy, SortOrder},
    state::AppState,
    upload::{BinaryAsset, MultipartForm, PDF_MIME},
    validation::require_fields,
};

const REPORT_NOT_FOUND: &str = "Report not found";
const REPORT_HAS_PURCHASES: &str = "Report has purchases; archive it instead";

#[derive(Debug, FromQueryResult)]
struct FileRow {
    report_name: String,
    file: Vec<u8>,
    file_content_type: String,
}

#[derive(Debug, FromQueryResult)]
struct ThumbnailRow {
    thumbnail: Option<Vec<u8>>,
    thumbnail_type: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct SampleRow {
    report_name: String,
    sample_pdf: Option<Vec<u8>>,
    sample_pdf_type: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct PreviewRow {
    report_name: String,
    file: Vec<u8>,
    size: String,
    cost: f64,
    last_modified: chrono::DateTime<Utc>,
}

fn parse_cost(raw: &str) -> AppResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(cost) if cost.is_finite() && cost >= 0.0 => Ok(cost),
        _ => Err(AppError::validation("cost must be a non-negative number")),
    }
}

fn parse_status(raw: &str) -> AppResult<ReportStatus> {
    raw.parse::<ReportStatus>().map_err(AppError::Validation)
}

pub async fn list_reports(
    state: &AppState,
    query: ReportListQuery,
) -> AppResult<ApiResponse<Vec<Report>>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(industry) = query.industry.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Industry.eq(industry.as_str()));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status = parse_status(status)?;
        condition = condition.add(Column::Status.eq(status.as_str()));
    }
    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(Column::ReportName).ilike(pattern));
    }

    let sort_col = match query.sort_by.unwrap_or(ReportSortBy::UploadDate) {
        ReportSortBy::UploadDate => Column::UploadDate,
        ReportSortBy::Cost => Column::Cost,
        ReportSortBy::Name => Column::ReportName,
    };
    let mut finder = Reports::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .select_only()
        .columns(Report::COLUMNS)
        .limit(limit as u64)
        .offset(offset as u64)
        .into_model::<Report>()
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Reports",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn list_by_industry(
    state: &AppState,
    industry: String,
) -> AppResult<ApiResponse<Vec<Report>>> {
    let industry = industry.trim();
    if industry.is_empty() {
        return Err(AppError::validation("Industry parameter is required"));
    }

    let items = Reports::find()
        .filter(Column::Industry.eq(industry))
        .order_by_desc(Column::UploadDate)
        .select_only()
        .columns(Report::COLUMNS)
        .into_model::<Report>()
        .all(&state.orm)
        .await?;
    if items.is_empty() {
        return Err(AppError::not_found(
            "No reports found for the specified industry",
        ));
    }

    let total = items.len() as i64;
    Ok(ApiResponse::success("Reports", items, Some(Meta::total(total))))
}

pub async fn find_report(state: &AppState, id: Uuid) -> AppResult<Option<Report>> {
    let report = Reports::find_by_id(id)
        .select_only()
        .columns(Report::COLUMNS)
        .into_model::<Report>()
        .one(&state.orm)
        .await?;
    Ok(report)
}

pub async fn get_report(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Report>> {
    let report = match find_report(state, id).await? {
        Some(r) => r,
        None => return Err(AppError::not_found(REPORT_NOT_FOUND)),
    };
    Ok(ApiResponse::success("Report", report, None))
}

pub async fn create_report(
    state: &AppState,
    staff: &ManagerAuth,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<Report>> {
    let file = match form.take_pdf("file")? {
        Some(f) => f,
        None => return Err(AppError::validation("No PDF file uploaded")),
    };
    require_fields(&[
        ("reportName", form.text("reportName")),
        ("industry", form.text("industry")),
        ("cost", form.text("cost")),
        ("description", form.text("description")),
    ])?;
    let cost = parse_cost(form.text("cost").unwrap_or_default())?;
    let status = match form.text("status") {
        Some(raw) => parse_status(raw)?,
        None => ReportStatus::Active,
    };
    let thumbnail = form.take_image("thumbnail")?;
    let sample = form.take_pdf("samplePdf")?;
    let now = Utc::now().fixed_offset();

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        serial_number: Set(form.text("serialNumber").map(str::to_string)),
        report_name: Set(form.text("reportName").unwrap_or_default().to_string()),
        industry: Set(form.text("industry").unwrap_or_default().to_string()),
        cost: Set(cost),
        size: Set(file.size_label()),
        status: Set(status.as_str().to_string()),
        file_type: Set("PDF".to_string()),
        description: Set(form.text("description").unwrap_or_default().to_string()),
        file_content_type: Set(file.content_type),
        file: Set(file.data),
        thumbnail_type: Set(thumbnail.as_ref().map(|t| t.content_type.clone())),
        thumbnail: Set(thumbnail.map(|t| t.data)),
        sample_pdf_type: Set(sample.as_ref().map(|s| s.content_type.clone())),
        sample_pdf: Set(sample.map(|s| s.data)),
        upload_date: Set(now),
        last_modified: Set(now),
        ..Default::default()
    };
    let report = active.insert(&state.orm).await?;

    record(
        state,
        staff,
        "report_create",
        "reports",
        serde_json::json!({ "report_id": report.id, "report_name": report.report_name }),
    )
    .await;

    Ok(ApiResponse::success("Report created", report.into(), None))
}

pub async fn update_report(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<Report>> {
    let file = form.take_pdf("file")?;
    let thumbnail = form.take_image("thumbnail")?;
    let sample = form.take_pdf("samplePdf")?;

    let mut active = ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(v) = form.text("reportName") {
        active.report_name = Set(v.to_string());
    }
    if let Some(v) = form.text("industry") {
        active.industry = Set(v.to_string());
    }
    if let Some(v) = form.text("description") {
        active.description = Set(v.to_string());
    }
    if let Some(v) = form.text("serialNumber") {
        active.serial_number = Set(Some(v.to_string()));
    }
    if let Some(v) = form.text("cost") {
        active.cost = Set(parse_cost(v)?);
    }
    if let Some(v) = form.text("status") {
        active.status = Set(parse_status(v)?.as_str().to_string());
    }
    if let Some(file) = file {
        active.size = Set(file.size_label());
        active.file_content_type = Set(file.content_type);
        active.file = Set(file.data);
    }
    if let Some(thumb) = thumbnail {
        active.thumbnail_type = Set(Some(thumb.content_type));
        active.thumbnail = Set(Some(thumb.data));
    }
    if let Some(sample) = sample {
        active.sample_pdf_type = Set(Some(sample.content_type));
        active.sample_pdf = Set(Some(sample.data));
    }
    let now = Utc::now().fixed_offset();
    active.last_modified = Set(now);
    active.updated_at = Set(now);

    let report = match active.update(&state.orm).await {
        Ok(r) => r,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found(REPORT_NOT_FOUND)),
        Err(err) => return Err(err.into()),
    };

    record(
        state,
        staff,
        "report_update",
        "reports",
        serde_json::json!({ "report_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Report updated", report.into(), None))
}

pub async fn delete_report(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Reports::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|e| AppError::still_referenced(e, REPORT_HAS_PURCHASES))?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(REPORT_NOT_FOUND));
    }

    record(
        state,
        staff,
        "report_delete",
        "reports",
        serde_json::json!({ "report_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Report deleted successfully"))
}

pub async fn thumbnail(state: &AppState, id: Uuid) -> AppResult<BinaryAsset> {
    let row = Reports::find_by_id(id)
        .select_only()
        .columns([Column::Thumbnail, Column::ThumbnailType])
        .into_model::<ThumbnailRow>()
        .one(&state.orm)
        .await?;

    match row {
        Some(ThumbnailRow {
            thumbnail: Some(data),
            thumbnail_type,
        }) => Ok(BinaryAsset::new(
            data,
            thumbnail_type.unwrap_or_else(|| "image/jpeg".to_string()),
        )),
        _ => Err(AppError::not_found("Thumbnail not found")),
    }
}

/// Primary document and the report name used for the download filename.
pub async fn document(state: &AppState, id: Uuid) -> AppResult<(BinaryAsset, String)> {
    let row = Reports::find_by_id(id)
        .select_only()
        .columns([Column::ReportName, Column::File, Column::FileContentType])
        .into_model::<FileRow>()
        .one(&state.orm)
        .await?;

    match row {
        Some(row) => Ok((
            BinaryAsset::new(row.file, row.file_content_type),
            row.report_name,
        )),
        None => Err(AppError::not_found(REPORT_NOT_FOUND)),
    }
}

pub async fn sample_pdf(state: &AppState, id: Uuid) -> AppResult<(BinaryAsset, String)> {
    let row = Reports::find_by_id(id)
        .select_only()
        .columns([Column::ReportName, Column::SamplePdf, Column::SamplePdfType])
        .into_model::<SampleRow>()
        .one(&state.orm)
        .await?;

    match row {
        Some(SampleRow {
            report_name,
            sample_pdf: Some(data),
            sample_pdf_type,
        }) => Ok((
            BinaryAsset::new(data, sample_pdf_type.unwrap_or_else(|| PDF_MIME.to_string())),
            report_name,
        )),
        _ => Err(AppError::not_found("Sample PDF not found")),
    }
}

pub async fn preview(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ReportPreview>> {
    let row = Reports::find_by_id(id)
        .select_only()
        .columns([
            Column::ReportName,
            Column::File,
            Column::Size,
            Column::Cost,
            Column::LastModified,
        ])
        .into_model::<PreviewRow>()
        .one(&state.orm)
        .await?;
    let row = match row {
        Some(r) => r,
        None => return Err(AppError::not_found(REPORT_NOT_FOUND)),
    };

    let extracted = extract_pdf(row.file).await?;
    let sections = split_into_sections(&extracted.text);
    tracing::debug!(report_id = %id, sections = sections.len(), "preview generated");

    Ok(ApiResponse::success(
        "Preview",
        ReportPreview {
            report_name: row.report_name,
            sections,
            metadata: PreviewMetadata {
                size: row.size,
                last_modified: row.last_modified,
                cost: row.cost,
                total_pages: extracted.total_pages,
            },
        },
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_must_be_non_negative_number() {
        assert_eq!(parse_cost(" 199.5 ").unwrap(), 199.5);
        assert!(parse_cost("-1").is_err());
        assert!(parse_cost("free").is_err());
        assert!(parse_cost("NaN").is_err());
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(parse_status("archived").unwrap(), ReportStatus::Archived);
        assert!(parse_status("published").is_err());
    }
}
