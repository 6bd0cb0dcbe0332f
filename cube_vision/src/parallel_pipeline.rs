// THEORY:
// Sampling six photographs is the only part of a reconstruction that scales with
// image size, and the six faces are independent of each other until resolution. The
// `ParallelPipeline` fans the per-face work out over tokio's blocking pool, bounded
// by a semaphore sized to the machine, then joins the scans in input order and runs
// the cheap cube-level stages on the caller's task.
//
// The output is identical to `CubePipeline::process_images` for the same input;
// only the wall-clock time differs.

use crate::core_modules::face::FaceScan;
use crate::error::{Result, ScanError};
use crate::pipeline::{CubePipeline, FACE_COUNT, PipelineConfig, Reconstruction};
use futures::future::join_all;
use image::RgbImage;
use log::debug;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct ParallelPipeline {
    pipeline: Arc<CubePipeline>,
    permits: Arc<Semaphore>,
}

impl ParallelPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self::from_pipeline(CubePipeline::new(config)?))
    }

    /// Wraps an existing pipeline, allowing one face scan per CPU at a time.
    pub fn from_pipeline(pipeline: CubePipeline) -> Self {
        Self::with_workers(pipeline, num_cpus::get())
    }

    pub fn with_workers(pipeline: CubePipeline, workers: usize) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Samples and classifies every image concurrently. Scans come back in input
    /// order, numbered from 1.
    pub async fn scan_faces(&self, images: Vec<RgbImage>) -> Result<Vec<FaceScan>> {
        let tasks = images.into_iter().enumerate().map(|(index, image)| {
            let input_index = index + 1;
            let pipeline = Arc::clone(&self.pipeline);
            let permits = Arc::clone(&self.permits);
            let worker_failed = move |reason: String| ScanError::WorkerFailed {
                input_index,
                reason,
            };
            async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| worker_failed(e.to_string()))?;
                debug!("scanning image #{input_index} on the blocking pool");
                let scan =
                    tokio::task::spawn_blocking(move || pipeline.scan_face(&image, input_index))
                        .await
                        .map_err(|e| worker_failed(e.to_string()))??;
                Ok::<FaceScan, ScanError>(scan)
            }
        });

        join_all(tasks).await.into_iter().collect()
    }

    /// The concurrent counterpart of `CubePipeline::process_images`.
    pub async fn process_images(&self, images: Vec<RgbImage>) -> Result<Reconstruction> {
        if images.len() != FACE_COUNT {
            return Err(ScanError::WrongScanCount {
                found: images.len(),
            });
        }
        let scans = self.scan_faces(images).await?;
        self.pipeline.reconstruct(&scans)
    }
}
