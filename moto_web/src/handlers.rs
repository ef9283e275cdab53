use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use axum::{extract::State, Json};
use moto_rental::{
    domain::booking::{
        parse_date, resolve_booking_period_str, BookingDraft, BookingDraftId, BookingSubmission,
        Currency, Money, Motorcycle, MotorcycleId, MotorcycleRepository, PricingPolicy,
        RentalQuote, TimeSlot,
    },
    domain::Entity,
    infrastructure::catalog::InMemoryMotorcycleRepository,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    catalog: InMemoryMotorcycleRepository,
    policy: PricingPolicy,
    currency: Currency,
    next_draft_id: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        catalog: InMemoryMotorcycleRepository,
        policy: PricingPolicy,
        currency: Currency,
    ) -> Self {
        Self {
            catalog,
            policy,
            currency,
            next_draft_id: Arc::new(AtomicU64::new(1)),
        }
    }

    async fn motorcycle(&self, id: u64) -> Result<Motorcycle, AppError> {
        self.catalog
            .find_by_id(MotorcycleId::from(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Motorcycle {} not found", id)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub motorcycle_id: u64,
    pub pickup_date: String,
    pub pickup_time: String,
    pub dropoff_date: String,
    pub dropoff_time: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub motorcycle_id: u64,
    pub bookable: bool,
    pub duration: String,
    pub weekday_count: u32,
    pub weekend_count: u32,
    pub extra_hours: f64,
    pub total_hours: f64,
    pub quote: RentalQuote,
    pub display_total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MotorcycleResponse {
    pub id: u64,
    pub name: String,
    pub price_per_day_mon_thu: f64,
    pub price_per_day_fri_sun: f64,
}

pub async fn list_slots() -> Json<Vec<TimeSlot>> {
    Json(TimeSlot::all().collect())
}

pub async fn list_motorcycles(
    State(state): State<AppState>,
) -> Result<Json<Vec<MotorcycleResponse>>, AppError> {
    let motorcycles = state.catalog.find_all().await?;
    Ok(Json(
        motorcycles
            .into_iter()
            .map(|m| MotorcycleResponse {
                id: *m.id(),
                name: m.name().to_owned(),
                price_per_day_mon_thu: m.rates().price_per_day_mon_thu(),
                price_per_day_fri_sun: m.rates().price_per_day_fri_sun(),
            })
            .collect(),
    ))
}

/// 見積もり。入力が不完全な場合はエラーにせず0円を返す。
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let motorcycle = state.motorcycle(request.motorcycle_id).await?;
    let period = resolve_booking_period_str(
        &request.pickup_date,
        &request.pickup_time,
        &request.dropoff_date,
        &request.dropoff_time,
    );
    let quote = state
        .policy
        .quote(&period, motorcycle.rates(), request.quantity);
    Ok(Json(QuoteResponse {
        motorcycle_id: request.motorcycle_id,
        bookable: period.is_bookable(),
        duration: period.duration().to_owned(),
        weekday_count: period.weekday_count(),
        weekend_count: period.weekend_count(),
        extra_hours: period.extra_hours(),
        total_hours: period.total_hours(),
        quote,
        display_total: Money::new(quote.total, state.currency).to_string(),
    }))
}

pub async fn validate_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingSubmission>, AppError> {
    let motorcycle = state.motorcycle(request.motorcycle_id).await?;
    let id = BookingDraftId::from(state.next_draft_id.fetch_add(1, Ordering::Relaxed));
    let mut draft = BookingDraft::create(id, state.policy);
    draft.select_motorcycle(&motorcycle)?;
    draft.change_pickup(
        Some(parse_date(&request.pickup_date)?),
        Some(request.pickup_time.parse::<TimeSlot>()?),
    )?;
    draft.change_dropoff(
        Some(parse_date(&request.dropoff_date)?),
        Some(request.dropoff_time.parse::<TimeSlot>()?),
    )?;
    draft.change_quantity(request.quantity)?;
    Ok(Json(draft.submit()?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use moto_rental::domain::booking::{BookingError, RateCard};

    use super::*;

    fn state() -> AppState {
        let catalog = InMemoryMotorcycleRepository::new([Motorcycle::new(
            MotorcycleId::from(1),
            "Scrambler 400".to_owned(),
            RateCard::new(1000.0, 1500.0).unwrap(),
        )]);
        AppState::new(catalog, PricingPolicy::default(), Currency::INR)
    }

    fn request(pickup: (&str, &str), dropoff: (&str, &str), quantity: u32) -> BookingRequest {
        BookingRequest {
            motorcycle_id: 1,
            pickup_date: pickup.0.to_owned(),
            pickup_time: pickup.1.to_owned(),
            dropoff_date: dropoff.0.to_owned(),
            dropoff_time: dropoff.1.to_owned(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_list_slots() {
        let Json(slots) = list_slots().await;
        assert_eq!(slots.len(), 13);
    }

    #[tokio::test]
    async fn test_list_motorcycles() {
        let Json(motorcycles) = list_motorcycles(State(state())).await.unwrap();
        assert_eq!(motorcycles.len(), 1);
        assert_eq!(motorcycles[0].name, "Scrambler 400");
    }

    #[tokio::test]
    async fn test_quote() {
        let Json(response) = quote(
            State(state()),
            Json(request(("2024-06-06", "09:00"), ("2024-06-08", "09:00"), 2)),
        )
        .await
        .unwrap();
        assert!(response.bookable);
        assert_eq!(response.duration, "2 days 0 hours");
        assert_eq!(response.quote.total, 5000.0);
        assert_eq!(response.display_total, "₹5,000.00");
    }

    #[tokio::test]
    async fn test_quote_with_incomplete_input_is_zero() {
        let Json(response) = quote(
            State(state()),
            Json(request(("2024-06-06", ""), ("2024-06-08", "09:00"), 1)),
        )
        .await
        .unwrap();
        assert!(!response.bookable);
        assert_eq!(response.quote.total, 0.0);
        assert_eq!(response.duration, "0 days 0 hours");
    }

    #[tokio::test]
    async fn test_quote_unknown_motorcycle() {
        let mut body = request(("2024-06-06", "09:00"), ("2024-06-08", "09:00"), 1);
        body.motorcycle_id = 99;
        let error = quote(State(state()), Json(body)).await.unwrap_err();
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_booking() {
        let Json(submission) = validate_booking(
            State(state()),
            Json(request(("2024-06-03", "09:00"), ("2024-06-04", "12:00"), 1)),
        )
        .await
        .unwrap();
        assert_eq!(submission.motorcycle_id, MotorcycleId::from(1));
        assert_eq!(submission.dropoff_time.to_string(), "12:00");
    }

    #[tokio::test]
    async fn test_validate_rejects_short_booking() {
        let error = validate_booking(
            State(state()),
            Json(request(("2024-06-03", "09:00"), ("2024-06-03", "13:00"), 1)),
        )
        .await
        .unwrap_err();
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(
            error,
            AppError::Rejected(BookingError::BelowMinimumDuration { required_hours: 6, .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_rejects_malformed_time() {
        let error = validate_booking(
            State(state()),
            Json(request(("2024-06-03", "08:00"), ("2024-06-04", "13:00"), 1)),
        )
        .await
        .unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validate_rejects_malformed_date() {
        let error = validate_booking(
            State(state()),
            Json(request(("03/06/2024", "09:00"), ("2024-06-04", "13:00"), 1)),
        )
        .await
        .unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(error, AppError::BadRequest(msg) if msg == "Date must be formatted as YYYY-MM-DD"));
    }
}
