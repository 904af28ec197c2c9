pub mod calc;
pub mod etl;
pub mod extract;
pub mod pipeline;
pub mod table;

pub use crate::domain::model::{Page, RankingRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, OutputFormat, Pipeline, Storage};
pub use crate::utils::error::Result;
