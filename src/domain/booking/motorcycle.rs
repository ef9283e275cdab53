use async_trait::async_trait;
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Entity, Id};

use super::RateCard;

/// バイクカタログ
#[async_trait]
pub trait MotorcycleRepository {
    /// IDでバイクを検索する
    async fn find_by_id(&self, id: MotorcycleId) -> Result<Option<Motorcycle>, DataAccessError>;
    /// 全てのバイクを取得する
    async fn find_all(&self) -> Result<Vec<Motorcycle>, DataAccessError>;
}

/// バイクID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct MotorcycleId(u64);

impl Id for MotorcycleId {
    type Inner = u64;
}

/// バイクエンティティ。料金計算からは読み取りのみ。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Motorcycle {
    id: MotorcycleId,
    name: String,
    rates: RateCard,
}

impl Motorcycle {
    pub fn new(id: MotorcycleId, name: String, rates: RateCard) -> Self {
        Self { id, name, rates }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rates(&self) -> &RateCard {
        &self.rates
    }
}

impl Entity for Motorcycle {
    type Id = MotorcycleId;

    const ENTITY_NAME: &'static str = "motorcycle";

    fn id(&self) -> Self::Id {
        self.id
    }
}
