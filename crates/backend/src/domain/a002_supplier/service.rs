use contracts::domain::a002_supplier::{supplier_facets, Supplier, SupplierDto};
use contracts::shared::faceted_filter::{
    FacetOptionsResponse, FacetSelectionQuery, FacetedFilterEngine,
};
use uuid::Uuid;

use super::repository;

pub async fn list_all() -> anyhow::Result<Vec<Supplier>> {
    repository::list_all().await
}

/// Варианты фасетов для текущего выбора. Считаются тем же движком,
/// что и на клиенте, поэтому наборы вариантов совпадают.
pub async fn facets(query: &FacetSelectionQuery) -> anyhow::Result<FacetOptionsResponse> {
    let records = repository::list_all().await?;
    build_facets(records, query)
}

fn build_facets(
    records: Vec<Supplier>,
    query: &FacetSelectionQuery,
) -> anyhow::Result<FacetOptionsResponse> {
    let mut engine = FacetedFilterEngine::try_new(supplier_facets())?.with_records(records);
    query.apply(&mut engine)?;
    Ok(FacetOptionsResponse::from_engine(&engine))
}

/// Код по умолчанию из первых восьми символов id (id может быть не ASCII)
fn default_code(id: &str) -> String {
    format!("SUP-{}", id.chars().take(8).collect::<String>())
}

pub async fn create(dto: SupplierDto) -> anyhow::Result<String> {
    dto.validate().map_err(|e| anyhow::anyhow!(e))?;
    let id = dto
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let supplier = Supplier {
        id: id.clone(),
        code: dto.code.clone().unwrap_or_else(|| default_code(&id)),
        name: dto.name.trim().to_string(),
        supplier_type: dto.supplier_type,
        product: dto.product,
        category: dto.category,
        brand: dto.brand,
        state_id: dto.state_id,
        cluster_id: dto.cluster_id,
        district_id: dto.district_id,
    };
    repository::insert(&supplier).await?;
    Ok(id)
}

/// (наименование, тип, продукт, категория, бренд, штат, кластер, район)
const DEMO_SUPPLIERS: &[(&str, &str, &str, &str, Option<&str>, &str, Option<&str>, Option<&str>)] = &[
    ("Surya Traders", "Dealer", "Mono PERC panel", "Panels", Some("Waaree"), "GJ", Some("GJ-AHD"), Some("GJ-AHD-SND")),
    ("Sabarmati Solar", "Installer", "Rooftop EPC", "Services", None, "GJ", Some("GJ-AHD"), Some("GJ-AHD-DSK")),
    ("Tapi Power Systems", "Distributor", "String inverter", "Inverters", Some("Growatt"), "GJ", Some("GJ-SRT"), None),
    ("Diamond City Energy", "Dealer", "Lithium battery", "Storage", Some("Exide"), "GJ", Some("GJ-SRT"), Some("GJ-SRT-OLP")),
    ("Pink City Renewables", "Distributor", "Mono PERC panel", "Panels", Some("Adani"), "RJ", Some("RJ-JPR"), Some("RJ-JPR-SNG")),
    ("Amer Sun Works", "Installer", "Rooftop EPC", "Services", None, "RJ", Some("RJ-JPR"), Some("RJ-JPR-AMB")),
    ("Marwar Solar Hub", "Dealer", "String inverter", "Inverters", Some("Havells"), "RJ", Some("RJ-JDH"), None),
    ("Thar Cables", "Manufacturer", "DC cable", "Balance of system", Some(""), "RJ", None, None),
    ("Deccan Solar Mart", "Dealer", "Bifacial panel", "Panels", Some("Tata Power"), "MH", Some("MH-PNE"), Some("MH-PNE-HVL")),
    ("Sahyadri Storage", "Distributor", "Lithium battery", "Storage", Some("Luminous"), "MH", Some("MH-PNE"), Some("MH-PNE-MLS")),
];

pub fn demo_suppliers() -> Vec<SupplierDto> {
    DEMO_SUPPLIERS
        .iter()
        .enumerate()
        .map(
            |(i, (name, kind, product, category, brand, state, cluster, district))| SupplierDto {
                id: None,
                code: Some(format!("SUP-{:03}", i + 1)),
                name: name.to_string(),
                supplier_type: kind.to_string(),
                product: product.to_string(),
                category: category.to_string(),
                brand: brand.map(str::to_string),
                state_id: state.to_string(),
                cluster_id: cluster.map(str::to_string),
                district_id: district.map(str::to_string),
            },
        )
        .collect()
}

/// Вставка тестовых данных
pub async fn insert_test_data() -> anyhow::Result<()> {
    for dto in demo_suppliers() {
        create(dto).await?;
    }
    Ok(())
}

pub async fn seed_if_empty() -> anyhow::Result<bool> {
    if repository::count_all().await? > 0 {
        return Ok(false);
    }
    insert_test_data().await?;
    Ok(true)
}
