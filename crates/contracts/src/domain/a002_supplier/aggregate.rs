use serde::{Deserialize, Serialize};

use crate::domain::a001_location::LocationTier;
use crate::shared::faceted_filter::{Facet, Locatable};

/// Поставщик (дилер, дистрибьютор, инсталлятор) в обзоре поставщиков
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(rename = "supplierType")]
    pub supplier_type: String,
    pub product: String,
    pub category: String,
    pub brand: Option<String>,
    #[serde(rename = "stateId")]
    pub state_id: String,
    #[serde(rename = "clusterId")]
    pub cluster_id: Option<String>,
    #[serde(rename = "districtId")]
    pub district_id: Option<String>,
}

impl Locatable for Supplier {
    fn location_id(&self, tier: LocationTier) -> Option<&str> {
        match tier {
            LocationTier::Country => None,
            LocationTier::State => Some(self.state_id.as_str()),
            LocationTier::Cluster => self.cluster_id.as_deref(),
            LocationTier::District => self.district_id.as_deref(),
        }
    }
}

/// Фасеты панели расширенного фильтра поставщиков
pub fn supplier_facets() -> Vec<Facet<Supplier>> {
    vec![
        Facet::new("supplier_type", "Тип поставщика", |s: &Supplier| {
            Some(s.supplier_type.clone())
        }),
        Facet::new("product", "Продукт", |s: &Supplier| Some(s.product.clone())),
        Facet::new("category", "Категория", |s: &Supplier| Some(s.category.clone())),
        Facet::new("brand", "Бренд", |s: &Supplier| {
            s.brand.clone().filter(|b| !b.trim().is_empty())
        }),
    ]
}

/// DTO для создания поставщика (тестовые данные, импорт)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    #[serde(rename = "supplierType")]
    pub supplier_type: String,
    pub product: String,
    pub category: String,
    pub brand: Option<String>,
    #[serde(rename = "stateId")]
    pub state_id: String,
    #[serde(rename = "clusterId")]
    pub cluster_id: Option<String>,
    #[serde(rename = "districtId")]
    pub district_id: Option<String>,
}

impl SupplierDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Наименование не может быть пустым".into());
        }
        if self.supplier_type.trim().is_empty() {
            return Err("Тип поставщика не может быть пустым".into());
        }
        if self.state_id.trim().is_empty() {
            return Err("Штат обязателен".into());
        }
        if self.district_id.is_some() && self.cluster_id.is_none() {
            return Err("Район указан без кластера".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_location::LocationSelection;
    use crate::shared::faceted_filter::FacetedFilterEngine;

    fn supplier(id: &str, kind: &str, product: &str, state: &str) -> Supplier {
        Supplier {
            id: id.into(),
            code: format!("SUP-{}", id),
            name: format!("Supplier {}", id),
            supplier_type: kind.into(),
            product: product.into(),
            category: "Solar".into(),
            brand: Some(String::new()),
            state_id: state.into(),
            cluster_id: None,
            district_id: None,
        }
    }

    #[test]
    fn test_selecting_product_keeps_other_products_visible() {
        let mut engine = FacetedFilterEngine::new(supplier_facets()).with_records(vec![
            supplier("1", "Dealer", "Mono panel", "GJ"),
            supplier("2", "Dealer", "Inverter", "GJ"),
            supplier("3", "Distributor", "Battery", "RJ"),
        ]);
        engine.toggle_facet_value("product", "Inverter").unwrap();

        assert_eq!(engine.options_for("product").unwrap().len(), 3);
        assert_eq!(engine.filtered_records().len(), 1);
        assert_eq!(engine.options_for("supplier_type").unwrap(), vec!["Dealer".to_string()]);
    }

    #[test]
    fn test_blank_brand_is_absent() {
        let engine = FacetedFilterEngine::new(supplier_facets())
            .with_records(vec![supplier("1", "Dealer", "Inverter", "GJ")]);
        assert!(engine.options_for("brand").unwrap().is_empty());
    }

    #[test]
    fn test_location_scope_by_cluster() {
        let mut with_cluster = supplier("1", "Dealer", "Inverter", "GJ");
        with_cluster.cluster_id = Some("AHD".into());
        let mut engine = FacetedFilterEngine::new(supplier_facets())
            .with_records(vec![with_cluster, supplier("2", "Dealer", "Battery", "GJ")]);
        engine.set_location_scope(LocationSelection {
            state: Some("GJ".into()),
            cluster: Some("AHD".into()),
            ..Default::default()
        });
        let ids: Vec<&str> = engine.filtered_records().into_iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_dto_validation() {
        let dto = SupplierDto {
            id: None,
            code: None,
            name: "Surya Traders".into(),
            supplier_type: "Dealer".into(),
            product: "Inverter".into(),
            category: "Power".into(),
            brand: None,
            state_id: "GJ".into(),
            cluster_id: None,
            district_id: Some("SND".into()),
        };
        assert!(dto.validate().is_err());
    }
}
