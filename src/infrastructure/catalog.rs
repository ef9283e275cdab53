use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::{
    domain::{
        booking::{Motorcycle, MotorcycleId, MotorcycleRepository, RateCard},
        DataAccessError, Entity,
    },
    CatalogEntry,
};

/// 設定ファイルから読み込んだバイクカタログ
#[derive(Clone, Debug, Default)]
pub struct InMemoryMotorcycleRepository {
    motorcycles: Arc<HashMap<MotorcycleId, Motorcycle>>,
}

impl InMemoryMotorcycleRepository {
    pub fn new<T: IntoIterator<Item = Motorcycle>>(motorcycles: T) -> Self {
        Self {
            motorcycles: Arc::new(motorcycles.into_iter().map(|m| (m.id(), m)).collect()),
        }
    }

    pub fn from_config(entries: &[CatalogEntry]) -> Result<Self, DataAccessError> {
        let motorcycles = entries
            .iter()
            .map(|entry| -> Result<Motorcycle, DataAccessError> {
                let rates = RateCard::new(entry.price_per_day_mon_thu, entry.price_per_day_fri_sun)?;
                Ok(Motorcycle::new(
                    MotorcycleId::from(entry.id),
                    entry.name.clone(),
                    rates,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = motorcycles.len(), "motorcycle catalog loaded");
        Ok(Self::new(motorcycles))
    }
}

#[async_trait]
impl MotorcycleRepository for InMemoryMotorcycleRepository {
    async fn find_by_id(&self, id: MotorcycleId) -> Result<Option<Motorcycle>, DataAccessError> {
        Ok(self.motorcycles.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Motorcycle>, DataAccessError> {
        let mut motorcycles = self.motorcycles.values().cloned().collect::<Vec<_>>();
        motorcycles.sort_by_key(|m| *m.id());
        Ok(motorcycles)
    }
}
