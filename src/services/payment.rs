use crate::error::{RelayError, Result};
use crate::models::PluginResult;
use crate::platform::{PaymentPlatform, SheetEvent};
use crate::services::callbacks::CallbackRegistry;
use crate::services::relay::{JsonPayloadEncoder, PaymentRelay, PayloadEncoder, PresentOutcome};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct PaymentService {
    relay: Mutex<PaymentRelay>,
    callbacks: Arc<CallbackRegistry>,
}

impl PaymentService {
    pub fn new(platform: Arc<dyn PaymentPlatform>) -> Self {
        Self::with_encoder(platform, JsonPayloadEncoder::default())
    }

    pub fn with_encoder(
        platform: Arc<dyn PaymentPlatform>,
        encoder: impl PayloadEncoder + 'static,
    ) -> Self {
        let callbacks = Arc::new(CallbackRegistry::new());
        let relay = PaymentRelay::new(platform, callbacks.clone()).with_encoder(encoder);
        Self {
            relay: Mutex::new(relay),
            callbacks,
        }
    }

    pub async fn can_make_payments(&self) -> bool {
        self.relay.lock().await.can_make_payments()
    }

    pub async fn is_presenting(&self) -> bool {
        self.relay.lock().await.is_presenting()
    }

    pub async fn request_payment(&self, args: Value) -> Result<PluginResult> {
        // Register only once the relay is ours, so a caller dropped while
        // waiting for the lock leaves nothing behind in the registry.
        let (callback_id, receiver, outcome) = {
            let mut relay = self.relay.lock().await;
            let (callback_id, receiver) = self.callbacks.register();
            let outcome = relay.make_payment_request(&args, callback_id.clone());
            (callback_id, receiver, outcome)
        };

        match outcome {
            Ok(PresentOutcome::Shown) => {}
            Ok(PresentOutcome::Unavailable) => {
                self.callbacks.forget(&callback_id);
                return Err(RelayError::SheetUnavailable);
            }
            Err(e) => tracing::debug!("Payment request {} rejected: {}", callback_id, e),
        }

        receiver.await.map_err(|_| RelayError::CallbackDropped)
    }

    pub async fn dispatch(&self, event: SheetEvent) {
        self.relay.lock().await.handle_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommandStatus;
    use crate::platform::{
        AuthorizedPayment, PaymentToken, PlatformMethodKind, PlatformPaymentMethod,
        SimulatedPlatform,
    };
    use serde_json::json;
    use tokio_test::{assert_pending, assert_ready};

    fn order_args() -> Value {
        json!([{
            "countryCode": "US",
            "currencyCode": "USD",
            "merchantId": "merchant.test",
            "purpose": "Order #1",
            "amount": 9.99
        }])
    }

    fn authorized(kind: PlatformMethodKind) -> SheetEvent {
        SheetEvent::Authorized(AuthorizedPayment {
            token: PaymentToken {
                payment_data: br#"{"data":"opaque"}"#.to_vec(),
                transaction_identifier: "TXN123".to_string(),
                payment_method: PlatformPaymentMethod {
                    network: Some("visa".to_string()),
                    display_name: None,
                    kind,
                },
            },
        })
    }

    #[tokio::test]
    async fn request_resolves_when_sheet_authorizes() {
        let service = PaymentService::new(Arc::new(SimulatedPlatform::default()));

        let mut pending = tokio_test::task::spawn(service.request_payment(order_args()));
        assert_pending!(pending.poll());
        assert!(service.is_presenting().await);

        service.dispatch(authorized(PlatformMethodKind::EMoney)).await;

        let result = assert_ready!(pending.poll()).unwrap();
        assert_eq!(result.status, CommandStatus::Ok);
        let payload: Value = serde_json::from_str(result.message.as_str().unwrap()).unwrap();
        assert_eq!(payload["type"], "unknown");
        assert_eq!(payload["transactionIdentifier"], "TXN123");
        assert_eq!(payload["displayName"], "");
    }

    #[tokio::test]
    async fn request_resolves_with_cancellation() {
        let service = PaymentService::new(Arc::new(SimulatedPlatform::default()));

        let mut pending = tokio_test::task::spawn(service.request_payment(order_args()));
        assert_pending!(pending.poll());

        service.dispatch(SheetEvent::Dismissed).await;

        let result = assert_ready!(pending.poll()).unwrap();
        assert_eq!(result, PluginResult::error("Payment cancelled"));
        assert!(!service.is_presenting().await);
    }

    #[tokio::test]
    async fn invalid_arguments_resolve_immediately() {
        let service = PaymentService::new(Arc::new(SimulatedPlatform::default()));

        let result = service
            .request_payment(json!([{ "countryCode": "US" }]))
            .await
            .unwrap();

        assert_eq!(result, PluginResult::error("currencyCode is required"));
        assert!(!service.is_presenting().await);
    }

    #[tokio::test]
    async fn unavailable_sheet_is_an_error() {
        let platform = Arc::new(SimulatedPlatform::default());
        platform.set_presentable(false);
        let service = PaymentService::new(platform);

        let err = service.request_payment(order_args()).await.unwrap_err();
        assert!(matches!(err, RelayError::SheetUnavailable));
        assert_eq!(service.callbacks.pending(), 0);
    }

    #[tokio::test]
    async fn request_dropped_while_waiting_for_relay_leaves_no_callback() {
        let service = PaymentService::new(Arc::new(SimulatedPlatform::default()));

        let held = service.relay.lock().await;
        let mut waiting = tokio_test::task::spawn(service.request_payment(json!([{}])));
        assert_pending!(waiting.poll());
        drop(waiting);
        drop(held);

        assert_eq!(service.callbacks.pending(), 0);
        assert!(!service.is_presenting().await);
    }

    #[tokio::test]
    async fn busy_relay_rejects_concurrent_request() {
        let service = PaymentService::new(Arc::new(SimulatedPlatform::default()));

        let mut first = tokio_test::task::spawn(service.request_payment(order_args()));
        assert_pending!(first.poll());

        let second = service.request_payment(order_args()).await.unwrap();
        assert_eq!(second, PluginResult::error("Payment already in progress"));

        service.dispatch(authorized(PlatformMethodKind::Credit)).await;
        let result = assert_ready!(first.poll()).unwrap();
        assert!(result.is_ok());
    }
}
