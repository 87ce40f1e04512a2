use super::{AuthorizationStatus, PaymentPlatform, PlatformPaymentRequest};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    Present(PlatformPaymentRequest),
    CompleteAuthorization(AuthorizationStatus),
    DismissSheet,
}

pub struct SimulatedPlatform {
    can_make_payments: AtomicBool,
    presentable: AtomicBool,
    calls: Mutex<Vec<PlatformCall>>,
}

impl SimulatedPlatform {
    pub fn new(can_make_payments: bool) -> Self {
        tracing::info!(
            "Simulated payment platform initialized (can make payments: {})",
            can_make_payments
        );

        Self {
            can_make_payments: AtomicBool::new(can_make_payments),
            presentable: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_presentable(&self, presentable: bool) {
        self.presentable.store(presentable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.lock_calls().clone()
    }

    pub fn presented_requests(&self) -> Vec<PlatformPaymentRequest> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                PlatformCall::Present(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlatformCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<PlatformCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PaymentPlatform for SimulatedPlatform {
    fn can_make_payments(&self) -> bool {
        self.can_make_payments.load(Ordering::SeqCst)
    }

    fn present(&self, request: &PlatformPaymentRequest) -> bool {
        if !self.presentable.load(Ordering::SeqCst) {
            tracing::debug!("Simulated sheet not presentable, ignoring request");
            return false;
        }

        tracing::debug!(
            "Presenting simulated sheet for {} ({} {})",
            request.merchant_identifier,
            request.currency_code,
            request
                .summary_items
                .first()
                .map(|item| item.amount.to_string())
                .unwrap_or_default()
        );
        self.record(PlatformCall::Present(request.clone()));
        true
    }

    fn complete_authorization(&self, status: AuthorizationStatus) {
        self.record(PlatformCall::CompleteAuthorization(status));
    }

    fn dismiss_sheet(&self) {
        self.record(PlatformCall::DismissSheet);
    }
}
