use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::tasks::{CreateTaskRequest, HousekeepingRoom, ReportIssueRequest, UpdateTaskStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Task,
    response::ApiResponse,
    services::task_service,
    state::AppState,
    table::{TablePage, TableQuery},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task))
        .route("/{id}/status", patch(update_task_status))
        .route("/{id}/issue", put(report_issue))
}

pub fn housekeeping_router() -> Router<AppState> {
    Router::new().route("/rooms/{staff_id}", get(housekeeping_rooms))
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TableQuery),
    responses(
        (status = 200, description = "Tasks table", body = ApiResponse<TablePage<Task>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<ApiResponse<TablePage<Task>>>> {
    let resp = task_service::list_tasks(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task", body = ApiResponse<Task>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let resp = task_service::get_task(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Task created", body = ApiResponse<Task>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let resp = task_service::create_task(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/tasks/{id}/status",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Task status changed", body = ApiResponse<Task>),
        (status = 409, description = "Status change not allowed")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn update_task_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskStatusRequest>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let resp = task_service::update_task_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}/issue",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = ReportIssueRequest,
    responses(
        (status = 200, description = "Issue attached to the task", body = ApiResponse<Task>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn report_issue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportIssueRequest>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let resp = task_service::report_issue(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/housekeeping/rooms/{staff_id}",
    params(("staff_id" = Uuid, Path, description = "Staff member ID")),
    responses(
        (status = 200, description = "Rooms with open tasks for the staff member", body = ApiResponse<Vec<HousekeepingRoom>>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Tasks"
)]
pub async fn housekeeping_rooms(
    State(state): State<AppState>,
    user: AuthUser,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<HousekeepingRoom>>>> {
    let resp = task_service::housekeeping_rooms(&state, &user, staff_id).await?;
    Ok(Json(resp))
}
