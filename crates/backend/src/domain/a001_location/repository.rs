use chrono::Utc;
use contracts::domain::a001_location::{LocationId, LocationNode, LocationTier};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub tier: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn into_node(m: Model) -> Option<LocationNode> {
    let Some(tier) = LocationTier::from_code(&m.tier) else {
        tracing::warn!("a001_location {} has unknown tier '{}'", m.id, m.tier);
        return None;
    };
    Some(LocationNode {
        id: LocationId(m.id),
        tier,
        name: m.name,
        parent_id: m.parent_id.map(LocationId),
        is_active: m.is_active,
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Активные узлы уровня `tier` с родителем `parent` (None - без ограничения по родителю)
pub async fn list_children(
    tier: LocationTier,
    parent: Option<&str>,
) -> anyhow::Result<Vec<LocationNode>> {
    let mut query = Entity::find()
        .filter(Column::Tier.eq(tier.code()))
        .filter(Column::IsActive.eq(true));
    if let Some(parent) = parent {
        query = query.filter(Column::ParentId.eq(parent));
    }
    let mut items: Vec<LocationNode> = query
        .all(conn())
        .await?
        .into_iter()
        .filter_map(into_node)
        .collect();
    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<LocationNode>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.and_then(into_node))
}

pub async fn count_active_children(id: &str) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::ParentId.eq(id))
        .filter(Column::IsActive.eq(true))
        .count(conn())
        .await?;
    Ok(count)
}

pub async fn count_all() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(node: &LocationNode) -> anyhow::Result<()> {
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(node.id.0.clone()),
        tier: Set(node.tier.code().to_string()),
        name: Set(node.name.clone()),
        parent_id: Set(node.parent_id.as_ref().map(|p| p.0.clone())),
        is_active: Set(node.is_active),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
    };
    active.insert(conn()).await?;
    Ok(())
}

pub async fn update(node: &LocationNode) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(node.id.0.clone()),
        tier: Set(node.tier.code().to_string()),
        name: Set(node.name.clone()),
        parent_id: Set(node.parent_id.as_ref().map(|p| p.0.clone())),
        is_active: Set(node.is_active),
        updated_at: Set(Some(Utc::now())),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn set_active(id: &str, is_active: bool) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(is_active))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
