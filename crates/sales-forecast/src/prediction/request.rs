/// Wire keys accepted by the predict endpoint, in canonical order.
pub const REQUIRED_FIELDS: [&str; 8] = [
    STORE_ID,
    DAY_OF_WEEK,
    DATE,
    CUSTOMER_COUNT,
    OPEN,
    PROMOTION,
    STATE_HOLIDAY,
    SCHOOL_HOLIDAY,
];

pub const STORE_ID: &str = "store_ID";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const DATE: &str = "date";
pub const CUSTOMER_COUNT: &str = "nb_customers_on_day";
pub const OPEN: &str = "open";
pub const PROMOTION: &str = "promotion";
pub const STATE_HOLIDAY: &str = "state_holiday";
pub const SCHOOL_HOLIDAY: &str = "school_holiday";

/// A fully validated description of one store on one day.
///
/// Only [`validate`](super::validation::validate) builds these from untrusted input;
/// the date stays textual until the encoder parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub store_id: u64,
    pub day_of_week: DayOfWeek,
    pub date: String,
    pub customer_count: u64,
    pub is_open: bool,
    pub has_promotion: bool,
    pub state_holiday: StateHoliday,
    pub school_holiday: bool,
}

/// ISO weekday number, 1 = Monday through 7 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const MONDAY: DayOfWeek = DayOfWeek(1);

    pub fn new(value: u8) -> Option<Self> {
        (1..=7).contains(&value).then_some(Self(value))
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

/// State holiday category as coded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateHoliday {
    None,
    Public,
    Easter,
    Christmas,
}

impl StateHoliday {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Self::None),
            "a" => Some(Self::Public),
            "b" => Some(Self::Easter),
            "c" => Some(Self::Christmas),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::None => "0",
            Self::Public => "a",
            Self::Easter => "b",
            Self::Christmas => "c",
        }
    }
}
