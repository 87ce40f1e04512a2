use crate::error::{RelayError, Result};
use crate::models::{PaymentPayload, PaymentRequest, PluginResult};
use crate::platform::{
    AuthorizationStatus, AuthorizedPayment, PaymentPlatform, PlatformPaymentRequest, SheetEvent,
};
use crate::services::callbacks::{CallbackId, ResultSink};
use serde_json::Value;
use std::sync::Arc;

pub trait PayloadEncoder: Send + Sync {
    fn encode(&self, payload: &PaymentPayload) -> serde_json::Result<String>;
}

pub struct JsonPayloadEncoder {
    pub pretty: bool,
}

impl Default for JsonPayloadEncoder {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl PayloadEncoder for JsonPayloadEncoder {
    fn encode(&self, payload: &PaymentPayload) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(payload)
        } else {
            serde_json::to_string(payload)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    Shown,
    // Nothing is sent to the callback.
    Unavailable,
}

#[derive(Debug)]
enum SheetState {
    Idle,
    Presenting {
        callback_id: CallbackId,
        delivered: bool,
    },
}

pub struct PaymentRelay {
    platform: Arc<dyn PaymentPlatform>,
    sink: Arc<dyn ResultSink>,
    encoder: Box<dyn PayloadEncoder>,
    state: SheetState,
}

impl PaymentRelay {
    pub fn new(platform: Arc<dyn PaymentPlatform>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            platform,
            sink,
            encoder: Box::new(JsonPayloadEncoder::default()),
            state: SheetState::Idle,
        }
    }

    pub fn with_encoder(mut self, encoder: impl PayloadEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn can_make_payments(&self) -> bool {
        self.platform.can_make_payments()
    }

    pub fn is_presenting(&self) -> bool {
        matches!(self.state, SheetState::Presenting { .. })
    }

    pub fn make_payment_request(
        &mut self,
        args: &Value,
        callback_id: CallbackId,
    ) -> Result<PresentOutcome> {
        if self.is_presenting() {
            tracing::warn!("Rejecting payment request {}: a sheet is already up", callback_id);
            return Err(self.fail(&callback_id, RelayError::PresentationInProgress));
        }

        let request = match PaymentRequest::from_arguments(args) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(&callback_id, e)),
        };

        let platform_request = PlatformPaymentRequest::from(&request);
        if !self.platform.present(&platform_request) {
            tracing::warn!(
                "Platform could not build a payment sheet for {}",
                request.merchant_id
            );
            return Ok(PresentOutcome::Unavailable);
        }

        tracing::info!(
            "Payment sheet presented for {} {} ({})",
            request.amount,
            request.currency_code,
            callback_id
        );

        self.state = SheetState::Presenting {
            callback_id,
            delivered: false,
        };
        Ok(PresentOutcome::Shown)
    }

    pub fn handle_event(&mut self, event: SheetEvent) {
        match event {
            SheetEvent::Authorized(payment) => self.on_authorized(payment),
            SheetEvent::Dismissed => self.on_dismissed(),
        }
    }

    fn on_authorized(&mut self, payment: AuthorizedPayment) {
        // The sheet always shows success, whatever happens to the payload below.
        self.platform.complete_authorization(AuthorizationStatus::Success);

        let callback_id = match &mut self.state {
            SheetState::Presenting {
                callback_id,
                delivered,
            } if !*delivered => {
                *delivered = true;
                callback_id.clone()
            }
            SheetState::Presenting { callback_id, .. } => {
                tracing::warn!("Duplicate authorization for {}, ignoring", callback_id);
                return;
            }
            SheetState::Idle => {
                tracing::warn!("Authorization received with no sheet presented, ignoring");
                return;
            }
        };

        let payload = PaymentPayload::from_token(&payment.token);
        let result = match self.encoder.encode(&payload) {
            Ok(encoded) => {
                tracing::info!(
                    "Payment {} authorized ({} {:?})",
                    payload.transaction_identifier,
                    payload.network,
                    payload.kind
                );
                PluginResult::ok(encoded)
            }
            Err(e) => {
                let err = RelayError::Serialization(e);
                tracing::error!(error = ?err, "Failed to encode payment payload");
                PluginResult::error(err.to_string())
            }
        };

        self.sink.send(&callback_id, result);
    }

    fn on_dismissed(&mut self) {
        match std::mem::replace(&mut self.state, SheetState::Idle) {
            SheetState::Presenting {
                callback_id,
                delivered: false,
            } => {
                tracing::info!("Payment sheet closed without authorization ({})", callback_id);
                self.fail(&callback_id, RelayError::UserCancelled);
            }
            SheetState::Presenting { callback_id, .. } => {
                tracing::debug!("Payment sheet closed after delivery ({})", callback_id);
            }
            SheetState::Idle => {
                tracing::debug!("Dismissal received with no sheet presented");
            }
        }

        self.platform.dismiss_sheet();
    }

    fn fail(&self, callback_id: &CallbackId, err: RelayError) -> RelayError {
        self.sink.send(callback_id, PluginResult::error(err.to_string()));
        err
    }
}
