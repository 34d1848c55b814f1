pub mod daily_close;
pub mod forward_returns;

pub use daily_close::{extract_daily_closes, DailyClose};
pub use forward_returns::{
    DailyForwardReturnCalculator, ForwardReturnRecord, ForwardReturnSummary, FORWARD_HORIZON,
};
