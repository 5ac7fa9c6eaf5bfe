use contracts::domain::a002_supplier::Supplier;

use crate::shared::api_utils::get_json;

/// Полный список поставщиков; фильтрация выполняется на клиенте
pub async fn fetch_suppliers() -> Result<Vec<Supplier>, String> {
    get_json("/api/supplier").await
}
