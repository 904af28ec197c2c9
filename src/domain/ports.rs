use crate::domain::model::{Page, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(value.trim()))
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn topics(&self) -> &[String];
    fn max_items(&self) -> usize;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn compress(&self) -> bool;
    fn timeout_secs(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_ms(&self) -> u64;

    fn page_url(&self, topic: &str) -> String {
        format!("{}{}", self.base_url(), topic)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Page>>;
    async fn transform(&self, pages: Vec<Page>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
