pub mod simulated;

pub use simulated::{PlatformCall, SimulatedPlatform};

use crate::models::PaymentRequest;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SUPPORTED_NETWORKS: [PaymentNetwork; 4] = [
    PaymentNetwork::Visa,
    PaymentNetwork::MasterCard,
    PaymentNetwork::Amex,
    PaymentNetwork::ChinaUnionPay,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentNetwork {
    Visa,
    MasterCard,
    Amex,
    ChinaUnionPay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MerchantCapability {
    ThreeDSecure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPaymentRequest {
    pub merchant_identifier: String,
    pub country_code: String,
    pub currency_code: String,
    pub supported_networks: Vec<PaymentNetwork>,
    pub merchant_capability: MerchantCapability,
    pub summary_items: Vec<SummaryItem>,
}

impl From<&PaymentRequest> for PlatformPaymentRequest {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            merchant_identifier: request.merchant_id.clone(),
            country_code: request.country_code.clone(),
            currency_code: request.currency_code.clone(),
            supported_networks: SUPPORTED_NETWORKS.to_vec(),
            merchant_capability: MerchantCapability::ThreeDSecure,
            summary_items: vec![SummaryItem {
                label: request.purpose.clone(),
                amount: request.amount,
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMethodKind {
    Unknown,
    Debit,
    Credit,
    Prepaid,
    Store,
    #[serde(alias = "eMoney")]
    EMoney,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformPaymentMethod {
    pub network: Option<String>,
    pub display_name: Option<String>,
    pub kind: PlatformMethodKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentToken {
    pub payment_data: Vec<u8>,
    pub transaction_identifier: String,
    pub payment_method: PlatformPaymentMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizedPayment {
    pub token: PaymentToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    Authorized(AuthorizedPayment),
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    Success,
    Failure,
}

pub trait PaymentPlatform: Send + Sync {
    fn can_make_payments(&self) -> bool;

    // Returns false when no sheet could be built.
    fn present(&self, request: &PlatformPaymentRequest) -> bool;

    fn complete_authorization(&self, status: AuthorizationStatus);

    fn dismiss_sheet(&self);
}
