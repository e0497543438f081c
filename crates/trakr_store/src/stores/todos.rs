use sea_orm::QueryResult;
use sea_orm::sea_query::{Expr, Order, Query};

use super::{report_created, report_listing, report_status, require_id};
use crate::db::Todos;
use crate::store::{TrakrStore, opt_id_value, read, read_id, read_opt_id};
use jobtrakr_core::{Created, DbStatus, Listing, NamespaceId, TodoData, TrakrResult, UniqueId};

#[derive(Clone)]
pub struct TodoStore {
    store: TrakrStore,
    namespace: NamespaceId,
}

impl TodoStore {
    pub fn new(store: TrakrStore, namespace: NamespaceId) -> Self {
        Self { store, namespace }
    }

    pub async fn create_todo(&self, todo: &TodoData) -> Created {
        let user_id = i64::from(self.namespace.as_u32());
        let result = self
            .store
            .create_row(self.namespace, |id| {
                Query::insert()
                    .into_table(Todos::Table)
                    .columns([
                        Todos::Id,
                        Todos::JobId,
                        Todos::UserId,
                        Todos::Todo,
                        Todos::Completed,
                    ])
                    .values_panic([
                        id.to_i64().into(),
                        opt_id_value(todo.job_id).into(),
                        user_id.into(),
                        todo.todo.clone().into(),
                        todo.completed.into(),
                    ])
                    .to_owned()
            })
            .await;
        report_created("create todo", result)
    }

    pub async fn update_todo(&self, todo: &TodoData) -> DbStatus {
        report_status("update todo", self.try_update(todo).await)
    }

    async fn try_update(&self, todo: &TodoData) -> TrakrResult<DbStatus> {
        let id = require_id(todo.id, "todo")?;
        let update = Query::update()
            .table(Todos::Table)
            .values([
                (Todos::JobId, opt_id_value(todo.job_id).into()),
                (Todos::Todo, todo.todo.clone().into()),
                (Todos::Completed, todo.completed.into()),
            ])
            .and_where(Expr::col(Todos::Id).eq(id.to_i64()))
            .to_owned();
        self.store.apply_change(&update).await
    }

    pub async fn set_completed(&self, id: UniqueId) -> DbStatus {
        let update = Query::update()
            .table(Todos::Table)
            .values([(Todos::Completed, true.into())])
            .and_where(Expr::col(Todos::Id).eq(id.to_i64()))
            .to_owned();
        report_status("complete todo", self.store.apply_change(&update).await)
    }

    pub async fn delete_todo(&self, id: UniqueId) -> DbStatus {
        let delete = Query::delete()
            .from_table(Todos::Table)
            .and_where(Expr::col(Todos::Id).eq(id.to_i64()))
            .to_owned();
        report_status("delete todo", self.store.apply_change(&delete).await)
    }

    pub async fn fetch_job_todos(&self, job_id: UniqueId) -> Listing<TodoData> {
        report_listing("fetch todos", self.try_fetch(job_id).await)
    }

    async fn try_fetch(&self, job_id: UniqueId) -> TrakrResult<Vec<TodoData>> {
        let select = Query::select()
            .columns([
                Todos::Id,
                Todos::JobId,
                Todos::UserId,
                Todos::Todo,
                Todos::Completed,
            ])
            .from(Todos::Table)
            .and_where(Expr::col(Todos::JobId).eq(job_id.to_i64()))
            .order_by(Todos::Id, Order::Asc)
            .to_owned();
        let rows = self.store.fetch_all(&select).await?;
        rows.iter().map(todo_from_row).collect()
    }
}

fn todo_from_row(row: &QueryResult) -> TrakrResult<TodoData> {
    Ok(TodoData {
        id: Some(read_id(row, Todos::Id)?),
        job_id: read_opt_id(row, Todos::JobId)?,
        user_id: read(row, Todos::UserId)?,
        todo: read(row, Todos::Todo)?,
        completed: read(row, Todos::Completed)?,
    })
}
