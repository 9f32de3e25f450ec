use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::reviews::{CreateReviewRequest, UpdateReviewVisibilityRequest},
    entity::reviews::{
        ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews, Model as ReviewModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{BookingStatus, Review},
    response::{ApiResponse, Meta},
    services::booking_service,
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

/// Guests review a stay once, after it is completed.
pub async fn create_review(
    state: &AppState,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    payload.validate()?;
    let booking =
        booking_service::find_for_guest(&state.orm, &payload.booking_code, &payload.email).await?;
    if booking.status != BookingStatus::Completed {
        return Err(AppError::BadRequest(
            "Only completed stays can be reviewed".into(),
        ));
    }

    let existing = Reviews::find()
        .filter(ReviewCol::BookingId.eq(booking.id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("This booking was already reviewed".into()));
    }

    let created = ReviewActive {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        rating: Set(payload.rating),
        comment: Set(payload.comment.trim().to_string()),
        is_visible: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(booking_id = %booking.id, rating = created.rating, "review submitted");
    Ok(ApiResponse::success(
        "Review created",
        review_from_entity(created),
        Some(Meta::empty()),
    ))
}

pub async fn list_visible(state: &AppState) -> AppResult<ApiResponse<Vec<Review>>> {
    let items = Reviews::find()
        .filter(ReviewCol::IsVisible.eq(true))
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();
    Ok(ApiResponse::success("Reviews", items, Some(Meta::empty())))
}

fn review_table() -> DataTable<Review> {
    DataTable::new(vec![
        Column::new("rating", "Đánh giá", |r: &Review| Cell::Int(i64::from(r.rating))),
        Column::new("comment", "Nội dung", |r: &Review| Cell::text(&r.comment)),
        Column::new("isVisible", "Hiển thị", |r: &Review| Cell::Bool(r.is_visible)),
        Column::new("createdAt", "Ngày tạo", |r: &Review| Cell::Time(r.created_at)),
    ])
}

pub async fn list_all(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Review>>> {
    ensure_staff(user)?;
    let rows = Reviews::find()
        .order_by_desc(ReviewCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(review_from_entity)
        .collect();
    let (page, meta) = review_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Reviews", page, Some(meta)))
}

pub async fn set_visibility(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewVisibilityRequest,
) -> AppResult<ApiResponse<Review>> {
    ensure_staff(user)?;
    let review = Reviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ReviewActive = review.into();
    active.is_visible = Set(payload.is_visible);
    let updated = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "review_visibility",
        "reviews",
        serde_json::json!({ "review_id": id, "is_visible": payload.is_visible }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review updated",
        review_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Review>> {
    ensure_admin(user)?;
    let review = Reviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let snapshot = review_from_entity(review.clone());
    review.delete(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "review_delete",
        "reviews",
        serde_json::json!({ "review_id": id, "booking_id": snapshot.booking_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review deleted",
        snapshot,
        Some(Meta::empty()),
    ))
}

fn review_from_entity(model: ReviewModel) -> Review {
    Review {
        id: model.id,
        booking_id: model.booking_id,
        rating: model.rating,
        comment: model.comment,
        is_visible: model.is_visible,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
