use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct StorefrontEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> StorefrontEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Pipeline started");

        let phase = Instant::now();
        let extracted = self.pipeline.extract().await?;
        tracing::info!("Extract finished in {:?}", phase.elapsed());

        let phase = Instant::now();
        let transformed = self.pipeline.transform(extracted).await?;
        tracing::info!("Transform finished in {:?}", phase.elapsed());

        let phase = Instant::now();
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Load finished in {:?}", phase.elapsed());

        tracing::info!(
            "Pipeline finished in {:?}, output: {}",
            started.elapsed(),
            output_path
        );
        Ok(output_path)
    }
}
