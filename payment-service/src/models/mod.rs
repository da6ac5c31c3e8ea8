use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    CreditCard,
    DebitCard,
    NetBanking,
    Upi,
    Wallet,
}

/// Payment request accepted by `POST /processPayments`. Never validated.
///
/// Every field is optional and unknown fields are ignored, so any JSON object
/// is accepted.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentDetails {
    pub transaction_id: Option<String>,
    pub transaction_date: Option<NaiveDateTime>,
    pub order_id: Option<String>,
    pub order_value: Option<f64>,
    pub payment_type: Option<PaymentType>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub transaction_id: String,
    pub transaction_date: NaiveDateTime,
    pub status: String,
    pub reference_no: String,
    pub payment_date: NaiveDateTime,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
}
