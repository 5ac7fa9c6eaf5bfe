use thiserror::Error;

use crate::domain::a001_location::LocationTier;

/// Ошибки контроллера выбора локации
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Загрузка вариантов уровня не удалась. Выбор выше по иерархии не затронут.
    #[error("Не удалось загрузить уровень {tier}: {message}")]
    DependentLoadFailed { tier: LocationTier, message: String },

    /// Попытка выбрать нижний уровень без корректного родителя. Выбор не изменён.
    #[error("Некорректный выбор уровня {tier}: {reason}")]
    InconsistentSelection { tier: LocationTier, reason: String },
}

impl LocationError {
    pub fn tier(&self) -> LocationTier {
        match self {
            LocationError::DependentLoadFailed { tier, .. } => *tier,
            LocationError::InconsistentSelection { tier, .. } => *tier,
        }
    }
}

/// Ошибки движка фасетных фильтров (только ошибки использования)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unknown facet: {0}")]
    UnknownFacet(String),

    #[error("Duplicate facet: {0}")]
    DuplicateFacet(String),
}
