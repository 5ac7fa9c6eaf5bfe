use chrono::Utc;
use contracts::domain::a002_supplier::Supplier;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_supplier")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub name: String,
    pub supplier_type: String,
    pub product: String,
    pub category: String,
    pub brand: Option<String>,
    pub state_id: String,
    pub cluster_id: Option<String>,
    pub district_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Supplier {
    fn from(m: Model) -> Self {
        Supplier {
            id: m.id,
            code: m.code,
            name: m.name,
            supplier_type: m.supplier_type,
            product: m.product,
            category: m.category,
            brand: m.brand,
            state_id: m.state_id,
            cluster_id: m.cluster_id,
            district_id: m.district_id,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Supplier>> {
    let mut items: Vec<Supplier> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(items)
}

pub async fn count_all() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(supplier: &Supplier) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(supplier.id.clone()),
        code: Set(supplier.code.clone()),
        name: Set(supplier.name.clone()),
        supplier_type: Set(supplier.supplier_type.clone()),
        product: Set(supplier.product.clone()),
        category: Set(supplier.category.clone()),
        brand: Set(supplier.brand.clone()),
        state_id: Set(supplier.state_id.clone()),
        cluster_id: Set(supplier.cluster_id.clone()),
        district_id: Set(supplier.district_id.clone()),
        is_deleted: Set(false),
        created_at: Set(Some(Utc::now())),
    };
    active.insert(conn()).await?;
    Ok(())
}
