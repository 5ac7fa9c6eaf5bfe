use chrono::Utc;
use contracts::domain::a003_project::{Project, ProjectStatus};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_project")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub customer: String,
    pub capacity_kw: f64,
    pub status: String,
    pub state_id: String,
    pub cluster_id: String,
    pub district_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn into_project(m: Model) -> Option<Project> {
    let Some(status) = ProjectStatus::from_code(&m.status) else {
        tracing::warn!("a003_project {} has unknown status '{}'", m.id, m.status);
        return None;
    };
    Some(Project {
        id: m.id,
        code: m.code,
        customer: m.customer,
        capacity_kw: m.capacity_kw,
        status,
        state_id: m.state_id,
        cluster_id: m.cluster_id,
        district_id: m.district_id,
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Фильтр по локации; None на уровне - без ограничения
#[derive(Debug, Default, Clone)]
pub struct LocationFilter<'a> {
    pub state_id: Option<&'a str>,
    pub cluster_id: Option<&'a str>,
    pub district_id: Option<&'a str>,
}

pub async fn list_by_location(filter: LocationFilter<'_>) -> anyhow::Result<Vec<Project>> {
    let mut query = Entity::find().filter(Column::IsDeleted.eq(false));
    if let Some(state) = filter.state_id {
        query = query.filter(Column::StateId.eq(state));
    }
    if let Some(cluster) = filter.cluster_id {
        query = query.filter(Column::ClusterId.eq(cluster));
    }
    if let Some(district) = filter.district_id {
        query = query.filter(Column::DistrictId.eq(district));
    }
    let mut items: Vec<Project> = query
        .all(conn())
        .await?
        .into_iter()
        .filter_map(into_project)
        .collect();
    items.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(items)
}

pub async fn count_all() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(project: &Project) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(project.id.clone()),
        code: Set(project.code.clone()),
        customer: Set(project.customer.clone()),
        capacity_kw: Set(project.capacity_kw),
        status: Set(project.status.code().to_string()),
        state_id: Set(project.state_id.clone()),
        cluster_id: Set(project.cluster_id.clone()),
        district_id: Set(project.district_id.clone()),
        is_deleted: Set(false),
        created_at: Set(Some(Utc::now())),
    };
    active.insert(conn()).await?;
    Ok(())
}
