use contracts::domain::a001_location::LocationQuery;
use contracts::domain::a003_project::Project;

use crate::shared::api_utils::{get_json, with_query};

/// Проекты в пределах выбранной локации
pub async fn fetch_projects(query: &LocationQuery) -> Result<Vec<Project>, String> {
    let url = with_query("/api/project", query)?;
    get_json(&url).await
}
