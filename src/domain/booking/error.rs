use derive_more::{Display, Error};

/// 予約エラー
#[derive(Error, Display, Debug, Clone, PartialEq)]
pub enum BookingError {
    /// IDが一致しません
    #[display(fmt = "ID does not match")]
    MismatchedId,
    /// 予約フォームは既に作成済みです
    #[display(fmt = "Booking draft has already been created")]
    AlreadyCreated,
    /// バイクが選択されていません
    #[display(fmt = "Please select a motorcycle")]
    MotorcycleNotSelected,
    /// 受け取り日時が未入力です
    #[display(fmt = "Please select a pickup date and time")]
    PickupIncomplete,
    /// 返却日時が未入力です
    #[display(fmt = "Please select a drop-off date and time")]
    DropoffIncomplete,
    /// 返却日時が受け取り日時より前です
    #[display(fmt = "Drop-off must be after pickup")]
    DropoffBeforePickup,
    /// 台数が不正です
    #[display(fmt = "Quantity must be at least 1")]
    InvalidQuantity,
    /// 最低予約時間に達していません
    #[display(fmt = "Minimum booking duration is {} hours!", required_hours)]
    BelowMinimumDuration { required_hours: u32, actual_hours: f64 },
    /// 既に送信済みです
    #[display(fmt = "Booking has already been submitted")]
    AlreadySubmitted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_duration_message() {
        let error = BookingError::BelowMinimumDuration {
            required_hours: 6,
            actual_hours: 4.0,
        };
        assert_eq!(error.to_string(), "Minimum booking duration is 6 hours!");
    }
}
