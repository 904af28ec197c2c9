use crate::core::extract::RankingPage;
use crate::core::{ConfigProvider, OutputFormat, Page, Pipeline, RankingRecord, Storage, TransformResult};
use crate::utils::error::{Result, ToolkitError};
use reqwest::Client;
use std::io::Write;
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

pub const OUTPUT_STEM: &str = "rankings";
const USER_AGENT: &str = concat!("prework-toolkit/", env!("CARGO_PKG_VERSION"));

pub struct RankingsPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> RankingsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs()))
            .build()?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(ToolkitError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    /// 可重試的錯誤以固定間隔重試，其他錯誤直接回傳
    async fn fetch(&self, url: &str) -> Result<String> {
        let attempts = self.config.retry_attempts();
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "🔁 Request to {} failed ({}), retry {}/{}",
                        url,
                        e,
                        attempt,
                        attempts
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms())).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn parse_pages(pages: &[Page], limit: usize) -> Result<Vec<RankingRecord>> {
    let mut records = Vec::new();
    for page in pages {
        let page_records = RankingPage::parse(&page.html, limit).records(&page.topic)?;
        tracing::debug!("Parsed {} items from {}", page_records.len(), page.url);
        if page_records.is_empty() {
            tracing::warn!("⚠️ No ranking items found on {}", page.url);
        }
        records.extend(page_records);
    }
    Ok(records)
}

fn render_delimited(records: &[RankingRecord], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    if records.is_empty() {
        writer.write_record(["topic", "ranking", "rating", "reviews", "cost", "summary"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ToolkitError::ParseError {
        message: format!("delimited output is not UTF-8: {}", e),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RankingsPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::with_capacity(self.config.topics().len());

        // 每個主題頁面只抓一次
        for topic in self.config.topics() {
            let url = self.config.page_url(topic);
            tracing::info!("🌐 Fetching {}", url);
            let html = self.fetch(&url).await?;
            pages.push(Page {
                topic: topic.clone(),
                url,
                html,
            });
        }

        Ok(pages)
    }

    async fn transform(&self, pages: Vec<Page>) -> Result<TransformResult> {
        let records = parse_pages(&pages, self.config.max_items())?;

        Ok(TransformResult {
            csv_output: render_delimited(&records, b',')?,
            tsv_output: render_delimited(&records, b'\t')?,
            json_output: serde_json::to_string_pretty(&records)?,
            records,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let formats = self.config.output_formats();
        let contents = |format: OutputFormat| match format {
            OutputFormat::Csv => result.csv_output.as_bytes(),
            OutputFormat::Tsv => result.tsv_output.as_bytes(),
            OutputFormat::Json => result.json_output.as_bytes(),
        };

        if self.config.compress() {
            let filename = format!("{}.zip", OUTPUT_STEM);
            tracing::debug!("Creating ZIP file with {} files", formats.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for format in &formats {
                    zip.start_file::<_, ()>(
                        format!("{}.{}", OUTPUT_STEM, format.extension()),
                        FileOptions::default(),
                    )?;
                    zip.write_all(contents(*format))?;
                }
                zip.finish()?.into_inner()
            };

            self.storage.write_file(&filename, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), filename));
        }

        for format in &formats {
            let filename = format!("{}.{}", OUTPUT_STEM, format.extension());
            tracing::debug!("Writing {}", filename);
            self.storage.write_file(&filename, contents(*format)).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
