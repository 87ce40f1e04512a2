pub mod callbacks;
pub mod payment;
pub mod relay;

pub use callbacks::{CallbackId, CallbackRegistry, ResultSink};
pub use payment::PaymentService;
pub use relay::{JsonPayloadEncoder, PaymentRelay, PayloadEncoder, PresentOutcome};
