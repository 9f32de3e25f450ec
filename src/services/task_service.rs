use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Iterable, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::tasks::{CreateTaskRequest, HousekeepingRoom, ReportIssueRequest, UpdateTaskStatusRequest},
    entity::{
        rooms::{ActiveModel as RoomActive, Column as RoomCol, Entity as Rooms},
        tasks::{ActiveModel as TaskActive, Column as TaskCol, Entity as Tasks, Model as TaskModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{Priority, RoomStatus, StaffRole, Task, TaskIssue, TaskStatus, TaskType},
    response::{ApiResponse, Meta},
    services::room_service::room_from_entity,
    state::AppState,
    table::{Cell, Column, DataTable, TablePage, TableQuery},
};

fn task_table() -> DataTable<Task> {
    DataTable::new(vec![
        Column::new("title", "Công việc", |t: &Task| Cell::text(&t.title)),
        Column::new("taskType", "Loại", |t: &Task| Cell::text(t.task_type)),
        Column::new("status", "Trạng thái", |t: &Task| Cell::text(t.status)),
        Column::new("priority", "Ưu tiên", |t: &Task| Cell::text(t.priority)),
        Column::new("hasIssue", "Sự cố", |t: &Task| Cell::Bool(t.issue.is_some())),
        Column::new("createdAt", "Ngày tạo", |t: &Task| Cell::Time(t.created_at)),
    ])
}

pub async fn list_tasks(
    state: &AppState,
    user: &AuthUser,
    query: TableQuery,
) -> AppResult<ApiResponse<TablePage<Task>>> {
    ensure_staff(user)?;
    let mut finder = Tasks::find().order_by_desc(TaskCol::CreatedAt);
    if user.role == StaffRole::Staff {
        finder = finder.filter(TaskCol::AssignedTo.eq(user.user_id));
    }
    let rows = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(task_from_entity)
        .collect();
    let (page, meta) = task_table().apply(rows, &query)?;
    Ok(ApiResponse::success("Tasks", page, Some(meta)))
}

pub async fn get_task(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Task>> {
    ensure_staff(user)?;
    let task = Tasks::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_assignee(user, &task)?;
    Ok(ApiResponse::success(
        "Task",
        task_from_entity(task),
        Some(Meta::empty()),
    ))
}

pub async fn create_task(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTaskRequest,
) -> AppResult<ApiResponse<Task>> {
    ensure_admin(user)?;
    payload.validate()?;

    if let Some(room_id) = payload.room_id {
        Rooms::find_by_id(room_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unknown room".into()))?;
    }
    if let Some(staff_id) = payload.assigned_to {
        Users::find_by_id(staff_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::BadRequest("Unknown staff member".into()))?;
    }

    let created = TaskActive {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        task_type: Set(payload.task_type),
        status: Set(TaskStatus::Pending),
        priority: Set(payload.priority.unwrap_or(Priority::Medium)),
        room_id: Set(payload.room_id),
        assigned_to: Set(payload.assigned_to),
        issue: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "task_create",
        "tasks",
        serde_json::json!({ "task_id": created.id, "assigned_to": created.assigned_to }),
    )
    .await;

    Ok(ApiResponse::success(
        "Task created",
        task_from_entity(created),
        Some(Meta::empty()),
    ))
}

/// Moves a task along pending → in-progress → completed. Finishing a
/// cleaning task releases its room back to `available`.
pub async fn update_task_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTaskStatusRequest,
) -> AppResult<ApiResponse<Task>> {
    ensure_staff(user)?;
    let txn = state.orm.begin().await?;
    let task = Tasks::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_assignee(user, &task)?;

    let previous = task.status;
    if !previous.can_become(payload.status) {
        return Err(AppError::Conflict(format!(
            "Cannot move task from {previous} to {}",
            payload.status
        )));
    }

    if payload.status == TaskStatus::Completed && task.task_type == TaskType::Cleaning {
        if let Some(room_id) = task.room_id {
            let room = Rooms::find()
                .filter(RoomCol::Id.eq(room_id))
                .lock(LockType::Update)
                .one(&txn)
                .await?;
            if let Some(room) = room.filter(|room| room.status == RoomStatus::NeedCleaning) {
                let mut active: RoomActive = room.into();
                active.status = Set(RoomStatus::Available);
                active.update(&txn).await?;
                tracing::debug!(room_id = %room_id, "room cleaned and released");
            }
        }
    }

    let mut active: TaskActive = task.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        Some(user.user_id),
        "task_status_update",
        "tasks",
        serde_json::json!({ "task_id": id, "from": previous, "to": updated.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Task updated",
        task_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn report_issue(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ReportIssueRequest,
) -> AppResult<ApiResponse<Task>> {
    ensure_staff(user)?;
    payload.validate()?;
    let task = Tasks::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_assignee(user, &task)?;

    let mut active: TaskActive = task.into();
    active.issue = Set(Some(TaskIssue {
        category: payload.category,
        description: payload.description,
        images: payload.images,
    }));
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(task_id = %id, "issue reported");
    audit::record(
        state,
        Some(user.user_id),
        "task_issue_report",
        "tasks",
        serde_json::json!({ "task_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Issue reported",
        task_from_entity(updated),
        Some(Meta::empty()),
    ))
}

/// Rooms a housekeeper currently has open work in, with those tasks.
pub async fn housekeeping_rooms(
    state: &AppState,
    user: &AuthUser,
    staff_id: Uuid,
) -> AppResult<ApiResponse<Vec<HousekeepingRoom>>> {
    ensure_staff(user)?;
    if user.role == StaffRole::Staff && user.user_id != staff_id {
        return Err(AppError::Forbidden);
    }

    let tasks = Tasks::find()
        .filter(TaskCol::AssignedTo.eq(staff_id))
        .filter(TaskCol::Status.is_in(TaskStatus::iter().filter(|status| status.is_open())))
        .filter(TaskCol::RoomId.is_not_null())
        .order_by_asc(TaskCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let mut by_room: BTreeMap<Uuid, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(room_id) = task.room_id {
            by_room.entry(room_id).or_default().push(task_from_entity(task));
        }
    }

    let rooms = Rooms::find()
        .filter(RoomCol::Id.is_in(by_room.keys().copied().collect::<Vec<_>>()))
        .order_by_asc(RoomCol::RoomNumber)
        .all(&state.orm)
        .await?;
    let items = rooms
        .into_iter()
        .map(|room| HousekeepingRoom {
            tasks: by_room.remove(&room.id).unwrap_or_default(),
            room: room_from_entity(room),
        })
        .collect();

    Ok(ApiResponse::success(
        "Housekeeping rooms",
        items,
        Some(Meta::empty()),
    ))
}

/// Housekeepers only see and touch tasks assigned to them.
fn ensure_assignee(user: &AuthUser, task: &TaskModel) -> AppResult<()> {
    match user.role {
        StaffRole::Admin => Ok(()),
        StaffRole::Staff if task.assigned_to == Some(user.user_id) => Ok(()),
        StaffRole::Staff => Err(AppError::Forbidden),
    }
}

fn task_from_entity(model: TaskModel) -> Task {
    Task {
        id: model.id,
        title: model.title,
        description: model.description,
        task_type: model.task_type,
        status: model.status,
        priority: model.priority,
        room_id: model.room_id,
        assigned_to: model.assigned_to,
        issue: model.issue,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
