use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::record,
    entity::{
        Blogs,
        blogs::{ActiveModel, Column, Model as BlogModel},
    },
    error::{AppError, AppResult},
    middleware::auth::ManagerAuth,
    models::{Blog, BlogAuthor, BlogBlock, BlogThumbnail},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    upload::{BinaryAsset, MultipartForm},
    validation::require_fields,
};

const BLOG_NOT_FOUND: &str = "Blog not found";

/// Everything but the thumbnail bytes.
#[derive(Debug, FromQueryResult)]
struct BlogRow {
    id: Uuid,
    title: String,
    thumbnail_type: String,
    thumbnail_alt: String,
    author_name: String,
    published_date: DateTime<Utc>,
    content: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const BLOG_COLUMNS: [Column; 9] = [
    Column::Id,
    Column::Title,
    Column::ThumbnailType,
    Column::ThumbnailAlt,
    Column::AuthorName,
    Column::PublishedDate,
    Column::Content,
    Column::CreatedAt,
    Column::UpdatedAt,
];

#[derive(Debug, FromQueryResult)]
struct ThumbnailRow {
    thumbnail: Vec<u8>,
    thumbnail_type: String,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        let content = match serde_json::from_value(row.content) {
            Ok(blocks) => blocks,
            Err(err) => {
                tracing::warn!(
                    blog_id = %row.id,
                    error = %err,
                    "stored blog content is malformed"
                );
                Vec::new()
            }
        };
        Blog {
            id: row.id,
            title: row.title,
            thumbnail: BlogThumbnail {
                content_type: row.thumbnail_type,
                alt: row.thumbnail_alt,
            },
            author: BlogAuthor {
                name: row.author_name,
            },
            published_date: row.published_date,
            content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<BlogModel> for Blog {
    fn from(model: BlogModel) -> Self {
        BlogRow {
            id: model.id,
            title: model.title,
            thumbnail_type: model.thumbnail_type,
            thumbnail_alt: model.thumbnail_alt,
            author_name: model.author_name,
            published_date: model.published_date.with_timezone(&Utc),
            content: model.content,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
        .into()
    }
}

fn parse_author(raw: &str) -> AppResult<BlogAuthor> {
    let author: BlogAuthor = serde_json::from_str(raw)
        .map_err(|_| AppError::validation("author must be a JSON object with a name"))?;
    if author.name.trim().is_empty() {
        return Err(AppError::validation("author name is required"));
    }
    Ok(author)
}

fn parse_content(raw: &str) -> AppResult<Vec<BlogBlock>> {
    serde_json::from_str(raw).map_err(|e| {
        AppError::validation(format!(
            "content must be a JSON array of text, heading or subheading blocks: {e}"
        ))
    })
}

fn parse_published(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation("publishedDate must be an RFC 3339 timestamp"))
}

fn content_json(blocks: &[BlogBlock]) -> AppResult<serde_json::Value> {
    serde_json::to_value(blocks).map_err(|e| AppError::Internal(e.into()))
}

pub async fn list_blogs(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<Vec<Blog>>> {
    let (page, limit, offset) = pagination.normalize();
    let total = Blogs::find().count(&state.orm).await? as i64;
    let items = Blogs::find()
        .select_only()
        .columns(BLOG_COLUMNS)
        .order_by_desc(Column::PublishedDate)
        .limit(limit as u64)
        .offset(offset as u64)
        .into_model::<BlogRow>()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Blog::from)
        .collect();

    Ok(ApiResponse::success(
        "Blogs",
        items,
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_blog(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Blog>> {
    let row = Blogs::find_by_id(id)
        .select_only()
        .columns(BLOG_COLUMNS)
        .into_model::<BlogRow>()
        .one(&state.orm)
        .await?;
    match row {
        Some(row) => Ok(ApiResponse::success("Blog", row.into(), None)),
        None => Err(AppError::not_found(BLOG_NOT_FOUND)),
    }
}

pub async fn thumbnail(state: &AppState, id: Uuid) -> AppResult<BinaryAsset> {
    let row = Blogs::find_by_id(id)
        .select_only()
        .columns([Column::Thumbnail, Column::ThumbnailType])
        .into_model::<ThumbnailRow>()
        .one(&state.orm)
        .await?;
    match row {
        Some(row) => Ok(BinaryAsset::new(row.thumbnail, row.thumbnail_type)),
        None => Err(AppError::not_found(BLOG_NOT_FOUND)),
    }
}

pub async fn create_blog(
    state: &AppState,
    staff: &ManagerAuth,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<Blog>> {
    require_fields(&[
        ("title", form.text("title")),
        ("author", form.text("author")),
        ("content", form.text("content")),
    ])?;
    let thumbnail = match form.take_image("thumbnail")? {
        Some(t) => t,
        None => return Err(AppError::validation("Thumbnail image is required")),
    };
    let author = parse_author(form.text("author").unwrap_or_default())?;
    let blocks = parse_content(form.text("content").unwrap_or_default())?;
    let published = match form.text("publishedDate") {
        Some(raw) => parse_published(raw)?,
        None => Utc::now(),
    };

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(form.text("title").unwrap_or_default().to_string()),
        thumbnail: Set(thumbnail.data),
        thumbnail_type: Set(thumbnail.content_type),
        thumbnail_alt: Set(form.text("thumbnailAlt").unwrap_or_default().to_string()),
        author_name: Set(author.name.trim().to_string()),
        published_date: Set(published.into()),
        content: Set(content_json(&blocks)?),
        ..Default::default()
    };
    let blog = active.insert(&state.orm).await?;

    record(
        state,
        staff,
        "blog_create",
        "blogs",
        serde_json::json!({ "blog_id": blog.id, "title": blog.title }),
    )
    .await;

    Ok(ApiResponse::success("Blog created", blog.into(), None))
}

pub async fn update_blog(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
    mut form: MultipartForm,
) -> AppResult<ApiResponse<Blog>> {
    let mut active = ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    if let Some(title) = form.text("title") {
        active.title = Set(title.to_string());
    }
    if let Some(raw) = form.text("author") {
        active.author_name = Set(parse_author(raw)?.name.trim().to_string());
    }
    if let Some(raw) = form.text("content") {
        active.content = Set(content_json(&parse_content(raw)?)?);
    }
    if let Some(raw) = form.text("publishedDate") {
        active.published_date = Set(parse_published(raw)?.into());
    }
    if let Some(alt) = form.text("thumbnailAlt") {
        active.thumbnail_alt = Set(alt.to_string());
    }
    if let Some(thumb) = form.take_image("thumbnail")? {
        active.thumbnail_type = Set(thumb.content_type);
        active.thumbnail = Set(thumb.data);
    }
    active.updated_at = Set(Utc::now().into());

    let blog = match active.update(&state.orm).await {
        Ok(b) => b,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::not_found(BLOG_NOT_FOUND)),
        Err(err) => return Err(err.into()),
    };

    record(
        state,
        staff,
        "blog_update",
        "blogs",
        serde_json::json!({ "blog_id": id }),
    )
    .await;

    Ok(ApiResponse::success("Blog updated", blog.into(), None))
}

pub async fn delete_blog(
    state: &AppState,
    staff: &ManagerAuth,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Blogs::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found(BLOG_NOT_FOUND));
    }

    record(
        state,
        staff,
        "blog_delete",
        "blogs",
        serde_json::json!({ "blog_id": id }),
    )
    .await;

    Ok(ApiResponse::message("Blog deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlogBlockKind;

    #[test]
    fn content_blocks_parse_in_order() {
        let blocks = parse_content(
            r#"[{"type":"heading","content":"Intro"},{"type":"text","content":"Body"}]"#,
        )
        .unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlogBlockKind::Heading);
        assert_eq!(blocks[1].content, "Body");
    }

    #[test]
    fn unknown_block_kind_is_rejected() {
        assert!(parse_content(r#"[{"type":"quote","content":"x"}]"#).is_err());
    }

    #[test]
    fn author_requires_name() {
        assert_eq!(parse_author(r#"{"name":"Ada"}"#).unwrap().name, "Ada");
        assert!(parse_author(r#"{"name":"  "}"#).is_err());
        assert!(parse_author("Ada").is_err());
    }

    #[test]
    fn malformed_stored_content_renders_empty() {
        let now = Utc::now();
        let row = BlogRow {
            id: Uuid::new_v4(),
            title: "Outlook".into(),
            thumbnail_type: "image/png".into(),
            thumbnail_alt: String::new(),
            author_name: "Ada".into(),
            published_date: now,
            content: serde_json::json!({ "not": "a list" }),
            created_at: now,
            updated_at: now,
        };
        let blog = Blog::from(row);
        assert!(blog.content.is_empty());
        assert_eq!(blog.title, "Outlook");
    }

    #[test]
    fn published_date_accepts_rfc3339() {
        let dt = parse_published("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T08:00:00+00:00");
        assert!(parse_published("yesterday").is_err());
    }
}
