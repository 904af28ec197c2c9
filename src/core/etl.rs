use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting ETL process...");

        // Extract
        let pages = self.pipeline.extract().await?;
        tracing::info!("Extracted {} pages", pages.len());
        self.monitor.log_phase("Extract");

        // Transform
        let transformed = self.pipeline.transform(pages).await?;
        tracing::info!("Transformed {} records", transformed.records.len());
        self.monitor.log_phase("Transform");

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("Load");

        self.monitor.log_final();
        Ok(output_path)
    }
}
