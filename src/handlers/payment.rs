use crate::error::{RelayError, Result};
use crate::handlers::AppState;
use crate::models::PluginResult;
use crate::platform::{
    AuthorizedPayment, PaymentToken, PlatformMethodKind, PlatformPaymentMethod, SheetEvent,
};
use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::Value;

pub async fn can_make_payments(State(state): State<AppState>) -> Json<PluginResult> {
    Json(PluginResult::ok(state.payments.can_make_payments().await))
}

pub async fn make_payment_request(
    State(state): State<AppState>,
    Json(args): Json<Value>,
) -> Result<Json<PluginResult>> {
    let result = state.payments.request_payment(args).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeEvent {
    pub transaction_identifier: String,
    pub network: Option<String>,
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: PlatformMethodKind,
    // base64 of the opaque token bytes
    #[serde(default)]
    pub payment_data: String,
}

impl TryFrom<AuthorizeEvent> for AuthorizedPayment {
    type Error = RelayError;

    fn try_from(event: AuthorizeEvent) -> Result<Self> {
        let payment_data = STANDARD
            .decode(event.payment_data.trim())
            .map_err(|e| RelayError::InvalidEvent(format!("paymentData is not base64: {}", e)))?;

        Ok(AuthorizedPayment {
            token: PaymentToken {
                payment_data,
                transaction_identifier: event.transaction_identifier,
                payment_method: PlatformPaymentMethod {
                    network: event.network,
                    display_name: event.display_name,
                    kind: event.kind,
                },
            },
        })
    }
}

pub async fn simulate_authorize(
    State(state): State<AppState>,
    Json(event): Json<AuthorizeEvent>,
) -> Result<StatusCode> {
    let payment = AuthorizedPayment::try_from(event)?;
    state.payments.dispatch(SheetEvent::Authorized(payment)).await;
    Ok(StatusCode::ACCEPTED)
}

pub async fn simulate_dismiss(State(state): State<AppState>) -> StatusCode {
    state.payments.dispatch(SheetEvent::Dismissed).await;
    StatusCode::ACCEPTED
}
