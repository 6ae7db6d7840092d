pub mod etl;
pub mod range;
pub mod time;

pub use crate::domain::model::{DayHours, TimeOfDay, TimeRange};
pub use crate::domain::ports::{ConfigProvider, DiagnosticSink, PageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use range::RangeFormatter;
pub use time::TimeNormalizer;
