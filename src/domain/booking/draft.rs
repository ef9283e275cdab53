use chrono::{NaiveDate, NaiveDateTime};
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

use crate::domain::{Aggregation, Entity, Event, EventQueue, EventQueueIntoIter, Id};

use super::{
    resolve_booking_period, BookingError, BookingPeriod, Motorcycle, MotorcycleId, PricingPolicy,
    RateCard, RentalQuote, TimeSlot,
};

/// 予約フォームID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct BookingDraftId(u64);

impl Id for BookingDraftId {
    type Inner = u64;
}

/// 予約フォームイベント
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BookingDraftEvent {
    /// フォームが作成された
    BookingDraftCreated {
        id: BookingDraftId,
        policy: PricingPolicy,
    },
    /// バイクが選択された
    MotorcycleSelected {
        id: BookingDraftId,
        motorcycle_id: MotorcycleId,
        rates: RateCard,
    },
    /// 受け取り日時が変更された
    PickupChanged {
        id: BookingDraftId,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
    },
    /// 返却日時が変更された
    DropoffChanged {
        id: BookingDraftId,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
    },
    /// 台数が変更された
    QuantityChanged { id: BookingDraftId, quantity: u32 },
    /// 予約が送信された
    BookingSubmitted {
        id: BookingDraftId,
        submission: BookingSubmission,
    },
}

impl Event for BookingDraftEvent {
    type Id = BookingDraftId;
}

/// 送信される予約。料金は含めず、サーバー側で再計算される。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub motorcycle_id: MotorcycleId,
    pub pickup_date: NaiveDate,
    pub pickup_time: TimeSlot,
    pub dropoff_date: NaiveDate,
    pub dropoff_time: TimeSlot,
    pub quantity: u32,
}

/// 予約フォーム
///
/// 入力が変わるたびに期間と見積もりを再計算する。
#[derive(Debug, Clone)]
pub struct BookingDraft {
    id: BookingDraftId,
    policy: PricingPolicy,
    motorcycle_id: Option<MotorcycleId>,
    rates: Option<RateCard>,
    pickup_date: Option<NaiveDate>,
    pickup_time: Option<TimeSlot>,
    dropoff_date: Option<NaiveDate>,
    dropoff_time: Option<TimeSlot>,
    quantity: u32,
    period: Option<BookingPeriod>,
    quote: RentalQuote,
    created: bool,
    submitted: bool,

    events: EventQueue<BookingDraftEvent>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            id: BookingDraftId::default(),
            policy: PricingPolicy::default(),
            motorcycle_id: None,
            rates: None,
            pickup_date: None,
            pickup_time: None,
            dropoff_date: None,
            dropoff_time: None,
            quantity: 1,
            period: None,
            quote: RentalQuote::default(),
            created: false,
            submitted: false,
            events: EventQueue::default(),
        }
    }
}

impl BookingDraft {
    pub fn create(id: BookingDraftId, policy: PricingPolicy) -> Self {
        let mut entity = Self::default();
        entity.apply(BookingDraftEvent::BookingDraftCreated { id, policy });
        entity
    }

    pub fn select_motorcycle(&mut self, motorcycle: &Motorcycle) -> Result<(), BookingError> {
        self.dispatch(BookingDraftEvent::MotorcycleSelected {
            id: self.id,
            motorcycle_id: motorcycle.id(),
            rates: *motorcycle.rates(),
        })
    }

    pub fn change_pickup(
        &mut self,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
    ) -> Result<(), BookingError> {
        self.dispatch(BookingDraftEvent::PickupChanged {
            id: self.id,
            date,
            time,
        })
    }

    pub fn change_dropoff(
        &mut self,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
    ) -> Result<(), BookingError> {
        self.dispatch(BookingDraftEvent::DropoffChanged {
            id: self.id,
            date,
            time,
        })
    }

    pub fn change_quantity(&mut self, quantity: u32) -> Result<(), BookingError> {
        self.dispatch(BookingDraftEvent::QuantityChanged {
            id: self.id,
            quantity,
        })
    }

    /// 入力を検証して送信内容を確定する
    pub fn submit(&mut self) -> Result<BookingSubmission, BookingError> {
        let submission = self.submission().map_err(|e| {
            tracing::warn!(draft = %self.id, error = %e, "booking submission rejected");
            e
        })?;
        self.dispatch(BookingDraftEvent::BookingSubmitted {
            id: self.id,
            submission: submission.clone(),
        })?;
        tracing::info!(draft = %self.id, motorcycle = %submission.motorcycle_id, "booking submitted");
        Ok(submission)
    }

    pub fn period(&self) -> Option<&BookingPeriod> {
        self.period.as_ref()
    }

    pub fn quote(&self) -> &RentalQuote {
        &self.quote
    }

    pub fn duration(&self) -> &str {
        self.period
            .as_ref()
            .map(BookingPeriod::duration)
            .unwrap_or("0 days 0 hours")
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn motorcycle_id(&self) -> Option<MotorcycleId> {
        self.motorcycle_id
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    fn dispatch(&mut self, event: BookingDraftEvent) -> Result<(), BookingError> {
        self.validate(&event)?;
        self.apply(event);
        Ok(())
    }

    fn submission(&self) -> Result<BookingSubmission, BookingError> {
        if self.submitted {
            return Err(BookingError::AlreadySubmitted);
        }
        let motorcycle_id = self.motorcycle_id.ok_or(BookingError::MotorcycleNotSelected)?;
        let (pickup_date, pickup_time) = self
            .pickup_date
            .zip(self.pickup_time)
            .ok_or(BookingError::PickupIncomplete)?;
        let (dropoff_date, dropoff_time) = self
            .dropoff_date
            .zip(self.dropoff_time)
            .ok_or(BookingError::DropoffIncomplete)?;
        Self::validate_quantity(self.quantity)?;

        let pickup = pickup_date.and_time(pickup_time.time());
        let dropoff = dropoff_date.and_time(dropoff_time.time());
        Self::validate_order(pickup, dropoff)?;
        self.policy.ensure_minimum_duration(pickup, dropoff)?;

        Ok(BookingSubmission {
            motorcycle_id,
            pickup_date,
            pickup_time,
            dropoff_date,
            dropoff_time,
            quantity: self.quantity,
        })
    }

    fn recompute(&mut self) {
        self.period = match (
            self.pickup_date,
            self.pickup_time,
            self.dropoff_date,
            self.dropoff_time,
        ) {
            (Some(pd), Some(pt), Some(dd), Some(dt)) => Some(resolve_booking_period(pd, pt, dd, dt)),
            _ => None,
        };
        self.quote = match (&self.period, &self.rates) {
            (Some(period), Some(rates)) => self.policy.quote(period, rates, self.quantity),
            _ => RentalQuote {
                quantity: self.quantity,
                ..RentalQuote::default()
            },
        };
        tracing::debug!(
            draft = %self.id,
            duration = self.duration(),
            total = self.quote.total,
            "booking quote recomputed"
        );
    }

    fn validate_id(&self, id: &BookingDraftId) -> Result<(), BookingError> {
        if self.id != *id {
            return Err(BookingError::MismatchedId);
        }
        Ok(())
    }

    fn validate_editable(&self, id: &BookingDraftId) -> Result<(), BookingError> {
        self.validate_id(id)?;
        if self.submitted {
            return Err(BookingError::AlreadySubmitted);
        }
        Ok(())
    }

    fn validate_quantity(quantity: u32) -> Result<(), BookingError> {
        if quantity < 1 {
            return Err(BookingError::InvalidQuantity);
        }
        Ok(())
    }

    fn validate_order(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> Result<(), BookingError> {
        if dropoff < pickup {
            return Err(BookingError::DropoffBeforePickup);
        }
        Ok(())
    }
}

impl Entity for BookingDraft {
    type Id = BookingDraftId;

    const ENTITY_NAME: &'static str = "booking_draft";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Aggregation for BookingDraft {
    type Event = BookingDraftEvent;
    type Error = BookingError;

    fn validate(&self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            BookingDraftEvent::BookingDraftCreated { .. } => {
                if self.created {
                    return Err(BookingError::AlreadyCreated);
                }
                Ok(())
            }
            BookingDraftEvent::MotorcycleSelected { id, .. }
            | BookingDraftEvent::PickupChanged { id, .. }
            | BookingDraftEvent::DropoffChanged { id, .. } => self.validate_editable(id),
            BookingDraftEvent::QuantityChanged { id, quantity } => {
                self.validate_editable(id)?;
                Self::validate_quantity(*quantity)
            }
            BookingDraftEvent::BookingSubmitted { id, .. } => self.validate_editable(id),
        }
    }

    fn apply(&mut self, event: Self::Event) {
        if self.validate(&event).is_err() {
            return;
        }
        match event.clone() {
            BookingDraftEvent::BookingDraftCreated { id, policy } => {
                *self = Self {
                    id,
                    policy,
                    created: true,
                    ..Self::default()
                };
            }
            BookingDraftEvent::MotorcycleSelected {
                motorcycle_id,
                rates,
                ..
            } => {
                self.motorcycle_id = Some(motorcycle_id);
                self.rates = Some(rates);
            }
            BookingDraftEvent::PickupChanged { date, time, .. } => {
                self.pickup_date = date;
                self.pickup_time = time;
            }
            BookingDraftEvent::DropoffChanged { date, time, .. } => {
                self.dropoff_date = date;
                self.dropoff_time = time;
            }
            BookingDraftEvent::QuantityChanged { quantity, .. } => {
                self.quantity = quantity;
            }
            BookingDraftEvent::BookingSubmitted { .. } => {
                self.submitted = true;
            }
        }
        self.recompute();
        self.events.push(event);
    }

    fn events(&self) -> &EventQueue<Self::Event> {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue<Self::Event> {
        &mut self.events
    }
}

impl IntoIterator for BookingDraft {
    type Item = BookingDraftEvent;
    type IntoIter = EventQueueIntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, d)
    }

    fn slot(hour: u32) -> Option<TimeSlot> {
        TimeSlot::from_hour(hour).ok()
    }

    fn motorcycle() -> Motorcycle {
        Motorcycle::new(
            MotorcycleId::from(7),
            "Classic 350".to_owned(),
            RateCard::new(1000.0, 1500.0).unwrap(),
        )
    }

    fn draft() -> BookingDraft {
        let mut draft = BookingDraft::create(BookingDraftId(1), PricingPolicy::default());
        draft.select_motorcycle(&motorcycle()).unwrap();
        draft
    }

    #[test]
    fn test_quote_is_recomputed_on_change() {
        let mut draft = draft();
        assert_eq!(draft.quote().total, 0.0);
        assert_eq!(draft.duration(), "0 days 0 hours");

        draft.change_pickup(date(6), slot(9)).unwrap();
        assert!(draft.period().is_none());

        draft.change_dropoff(date(8), slot(9)).unwrap();
        assert_eq!(draft.duration(), "2 days 0 hours");
        assert_eq!(draft.quote().total, 2500.0);

        draft.change_quantity(2).unwrap();
        assert_eq!(draft.quote().total, 5000.0);
    }

    #[test]
    fn test_submit() {
        let mut draft = draft();
        draft.change_pickup(date(3), slot(9)).unwrap();
        draft.change_dropoff(date(3), slot(15)).unwrap();
        let submission = draft.submit().unwrap();
        assert_eq!(submission.motorcycle_id, MotorcycleId::from(7));
        assert_eq!(submission.pickup_time, TimeSlot::from_hour(9).unwrap());
        assert_eq!(submission.quantity, 1);
        assert!(draft.is_submitted());
        assert_eq!(draft.submit(), Err(BookingError::AlreadySubmitted));
        assert_eq!(draft.change_quantity(3), Err(BookingError::AlreadySubmitted));
    }

    #[test]
    fn test_submit_rejects_short_booking() {
        let mut draft = draft();
        draft.change_pickup(date(3), slot(9)).unwrap();
        draft.change_dropoff(date(3), slot(13)).unwrap();
        assert!(draft.quote().total > 0.0);
        let error = draft.submit().unwrap_err();
        assert_eq!(error.to_string(), "Minimum booking duration is 6 hours!");
        assert!(!draft.is_submitted());
    }

    #[test]
    fn test_submit_rejects_incomplete_input() {
        let mut draft = BookingDraft::create(BookingDraftId(2), PricingPolicy::default());
        assert_eq!(draft.submit(), Err(BookingError::MotorcycleNotSelected));
        draft.select_motorcycle(&motorcycle()).unwrap();
        assert_eq!(draft.submit(), Err(BookingError::PickupIncomplete));
        draft.change_pickup(date(3), None).unwrap();
        assert_eq!(draft.submit(), Err(BookingError::PickupIncomplete));
        draft.change_pickup(date(3), slot(9)).unwrap();
        assert_eq!(draft.submit(), Err(BookingError::DropoffIncomplete));
        draft.change_dropoff(date(2), slot(9)).unwrap();
        assert_eq!(draft.submit(), Err(BookingError::DropoffBeforePickup));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let mut draft = draft();
        assert_eq!(draft.change_quantity(0), Err(BookingError::InvalidQuantity));
        assert_eq!(draft.quantity(), 1);
    }

    #[test]
    fn test_events_replay() {
        let mut draft = draft();
        draft.change_pickup(date(6), slot(10)).unwrap();
        draft.change_dropoff(date(7), slot(16)).unwrap();
        let events = draft.pop_all();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events.first(),
            Some(BookingDraftEvent::BookingDraftCreated { .. })
        ));

        let mut replayed = BookingDraft::default();
        for event in events {
            replayed.apply(event);
        }
        assert_eq!(replayed.period(), draft.period());
        assert_eq!(replayed.quote(), draft.quote());
        assert_eq!(replayed.peek(), Some(&BookingDraftEvent::BookingDraftCreated {
            id: BookingDraftId(1),
            policy: PricingPolicy::default(),
        }));
    }

    #[test]
    fn test_created_draft_cannot_be_created_again() {
        let mut draft = draft();
        draft.change_pickup(date(6), slot(9)).unwrap();
        let recreate = BookingDraftEvent::BookingDraftCreated {
            id: BookingDraftId(9),
            policy: PricingPolicy::default(),
        };
        assert_eq!(draft.validate(&recreate), Err(BookingError::AlreadyCreated));

        draft.apply(recreate);
        assert_eq!(draft.id(), BookingDraftId(1));
        assert_eq!(draft.motorcycle_id(), Some(MotorcycleId::from(7)));
        assert!(draft.period().is_none());
        assert_eq!(draft.pop_all().len(), 3);
    }
}
