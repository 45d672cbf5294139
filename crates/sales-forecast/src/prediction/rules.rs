use super::request::PredictionRequest;

pub const SHORTCUT_MESSAGE: &str =
    "Store is closed or has no customers. Sales prediction is set to 0.";

/// Customer counts below this are underrepresented in the training data.
pub const LOW_TRAFFIC_THRESHOLD: u64 = 200;

pub const LOW_TRAFFIC_WARNING: &str =
    "Very few customers on this day. Prediction may be unreliable.";

/// Condition under which sales are zero by definition and the model is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroSalesReason {
    StoreClosed,
    NoCustomers,
}

impl ZeroSalesReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::StoreClosed => "store closed",
            Self::NoCustomers => "no customers",
        }
    }
}

/// Closed stores take precedence over empty ones.
pub fn zero_sales_reason(request: &PredictionRequest) -> Option<ZeroSalesReason> {
    if !request.is_open {
        Some(ZeroSalesReason::StoreClosed)
    } else if request.customer_count == 0 {
        Some(ZeroSalesReason::NoCustomers)
    } else {
        None
    }
}

pub fn is_low_traffic(request: &PredictionRequest) -> bool {
    request.customer_count < LOW_TRAFFIC_THRESHOLD
}
