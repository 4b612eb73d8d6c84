use std::{collections::HashMap, sync::LazyLock};

use globelens_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::manager_auths,
    error::AppError,
    middleware::auth::ManagerAuth,
    models::Role,
    routes::params::{AuditLogQuery, ReportListQuery},
    services::{manager_service, report_service},
    state::AppState,
    upload::{BinaryAsset, MultipartForm, PDF_MIME},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};
use tokio::sync::Mutex;
use uuid::Uuid;

static DB_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

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
        "TRUNCATE TABLE engagements, user_reports, payment_details, audit_logs, reports, \
         manager_auths, user_auths RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret".to_string()),
        "PAYPAL_CLIENT_ID" => Some("client".to_string()),
        "PAYPAL_SECRET_KEY" => Some("secret".to_string()),
        _ => None,
    })?;
    Ok(AppState::new(orm, config))
}

async fn create_manager(orm: &DatabaseConnection) -> anyhow::Result<ManagerAuth> {
    let manager = manager_auths::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set("catalog@example.com".into()),
        password_hash: Set("unused".into()),
        full_name: Set("Cat".into()),
        last_name: Set("Alog".into()),
        phone: Set("555-0101".into()),
        role: Set(Role::Manager.as_str().into()),
        ..Default::default()
    }
    .insert(orm)
    .await?;
    Ok(ManagerAuth {
        manager_id: manager.id,
        email: manager.email,
        role: Some(Role::Manager),
        ip_address: Some("198.51.100.4".into()),
    })
}

fn form(fields: &[(&str, &str)], files: Vec<(&str, BinaryAsset)>) -> MultipartForm {
    MultipartForm {
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        files: files
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    }
}

// Manager uploads a report, edits it and removes it; each change is audited.
#[tokio::test]
async fn report_lifecycle_is_audited() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let manager = create_manager(&state.orm).await?;

    let missing_file = report_service::create_report(
        &state,
        &manager,
        form(&[("reportName", "No File")], Vec::new()),
    )
    .await;
    assert!(matches!(missing_file, Err(AppError::Validation(_))));

    let pdf = BinaryAsset::new(b"%PDF-1.4 body".to_vec(), PDF_MIME);
    let created = report_service::create_report(
        &state,
        &manager,
        form(
            &[
                ("reportName", "Wind Turbine Outlook"),
                ("industry", "Energy"),
                ("cost", "249.5"),
                ("description", "Ten year forecast"),
            ],
            vec![("file", pdf.clone())],
        ),
    )
    .await?
    .data
    .expect("report");
    assert_eq!(created.status, "active");
    assert_eq!(created.cost, 249.5);

    let listed = report_service::list_reports(
        &state,
        ReportListQuery {
            q: Some("turbine".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.and_then(|m| m.total), Some(1));

    let by_industry = report_service::list_by_industry(&state, "Energy".into()).await?;
    assert_eq!(by_industry.data.expect("reports").len(), 1);
    let none = report_service::list_by_industry(&state, "Mining".into()).await;
    assert!(matches!(none, Err(AppError::NotFound(_))));

    let (document, name) = report_service::document(&state, created.id).await?;
    assert_eq!(document.data, pdf.data);
    assert_eq!(name, "Wind Turbine Outlook");

    let updated = report_service::update_report(
        &state,
        &manager,
        created.id,
        form(&[("cost", "199"), ("status", "archived")], Vec::new()),
    )
    .await?
    .data
    .expect("report");
    assert_eq!(updated.cost, 199.0);
    assert_eq!(updated.status, "archived");
    assert_eq!(updated.report_name, "Wind Turbine Outlook");

    report_service::delete_report(&state, &manager, created.id).await?;
    let gone = report_service::get_report(&state, created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));

    let logs = manager_service::list_audit_logs(&state, &manager, AuditLogQuery::default())
        .await?
        .data
        .expect("logs");
    let actions: Vec<&str> = logs.iter().map(|l| l.action_type.as_str()).collect();
    assert_eq!(actions.len(), 3);
    for action in ["report_create", "report_update", "report_delete"] {
        assert!(actions.contains(&action), "missing {action}");
    }
    assert!(
        logs.iter()
            .all(|l| l.ip_address.as_deref() == Some("198.51.100.4"))
    );

    Ok(())
}

// Thumbnail and sample come back byte for byte with the type they were
// uploaded as; replacing the thumbnail swaps both.
#[tokio::test]
async fn report_assets_keep_their_content_type() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let _guard = DB_LOCK.lock().await;
    let state = setup_state(&database_url).await?;
    let manager = create_manager(&state.orm).await?;

    let fields = [
        ("reportName", "Smart Meter Rollout"),
        ("industry", "Utilities"),
        ("cost", "120"),
        ("description", "Deployment tracker"),
    ];
    let pdf = BinaryAsset::new(b"%PDF-1.4 full".to_vec(), PDF_MIME);
    let png = BinaryAsset::new(vec![0x89, b'P', b'N', b'G', 1, 2, 3], "image/png");
    let sample = BinaryAsset::new(b"%PDF-1.4 sample".to_vec(), PDF_MIME);

    let bare = report_service::create_report(
        &state,
        &manager,
        form(&fields, vec![("file", pdf.clone())]),
    )
    .await?
    .data
    .expect("report");
    assert!(bare.thumbnail_type.is_none());
    let no_thumb = report_service::thumbnail(&state, bare.id).await;
    assert!(matches!(no_thumb, Err(AppError::NotFound(_))));
    let no_sample = report_service::sample_pdf(&state, bare.id).await;
    assert!(matches!(no_sample, Err(AppError::NotFound(_))));

    let wrong_kind = report_service::create_report(
        &state,
        &manager,
        form(
            &fields,
            vec![("file", pdf.clone()), ("thumbnail", sample.clone())],
        ),
    )
    .await;
    assert!(matches!(wrong_kind, Err(AppError::Validation(_))));

    let created = report_service::create_report(
        &state,
        &manager,
        form(
            &fields,
            vec![
                ("file", pdf.clone()),
                ("thumbnail", png.clone()),
                ("samplePdf", sample.clone()),
            ],
        ),
    )
    .await?
    .data
    .expect("report");
    assert_eq!(created.thumbnail_type.as_deref(), Some("image/png"));
    assert_eq!(created.sample_pdf_type.as_deref(), Some(PDF_MIME));

    let thumb = report_service::thumbnail(&state, created.id).await?;
    assert_eq!(thumb.data, png.data);
    assert_eq!(thumb.content_type, "image/png");

    let (stored_sample, name) = report_service::sample_pdf(&state, created.id).await?;
    assert_eq!(stored_sample.data, sample.data);
    assert_eq!(stored_sample.content_type, PDF_MIME);
    assert_eq!(name, "Smart Meter Rollout");

    let webp = BinaryAsset::new(b"RIFF0000WEBP".to_vec(), "image/webp");
    report_service::update_report(
        &state,
        &manager,
        created.id,
        form(&[], vec![("thumbnail", webp.clone())]),
    )
    .await?;
    let thumb = report_service::thumbnail(&state, created.id).await?;
    assert_eq!(thumb.data, webp.data);
    assert_eq!(thumb.content_type, "image/webp");

    // The primary document is untouched by the thumbnail swap.
    let (document, _) = report_service::document(&state, created.id).await?;
    assert_eq!(document.data, pdf.data);

    Ok(())
}
