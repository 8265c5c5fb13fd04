use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::{debug, error};

use crate::generator::{GenerationError, StoryGenerator};

// Queued generation job - prompt + one-time reply channel
pub struct GenerationJob {
    pub prompt: String,
    pub respond_to: oneshot::Sender<Result<String, GenerationError>>,
}

/// Bounded pool of generation workers draining a shared queue. At most
/// `workers` upstream calls run at once; further requests wait in the
/// channel up to `queue_capacity`.
#[derive(Clone)]
pub struct GenerationPool {
    job_tx: mpsc::Sender<GenerationJob>,
}

impl GenerationPool {
    pub fn spawn(
        generator: Arc<dyn StoryGenerator>,
        workers: usize,
        queue_capacity: usize,
    ) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<GenerationJob>(queue_capacity);
        let job_rx = Arc::new(Mutex::new(job_rx));

        for worker_id in 0..workers {
            let generator = Arc::clone(&generator);
            let job_rx = Arc::clone(&job_rx);
            tokio::spawn(async move {
                generation_worker(worker_id, generator, job_rx).await;
            });
        }

        Self { job_tx }
    }

    // Queue a prompt and wait for a worker to finish it
    pub async fn generate(&self, prompt: String) -> Result<String, GenerationError> {
        let (respond_to, response_rx) = oneshot::channel();
        self.job_tx
            .send(GenerationJob { prompt, respond_to })
            .await
            .map_err(|_| GenerationError::PoolClosed)?;
        response_rx.await.map_err(|_| GenerationError::PoolClosed)?
    }
}

async fn generation_worker(
    worker_id: usize,
    generator: Arc<dyn StoryGenerator>,
    job_rx: Arc<Mutex<mpsc::Receiver<GenerationJob>>>,
) {
    debug!(worker_id, "generation worker started");
    loop {
        // Hold the lock only while waiting for the next job, so other
        // workers can pick up jobs while this one is generating
        let job = {
            let mut rx = job_rx.lock().await;
            rx.recv().await
        };
        let Some(job) = job else { break };

        let result = generator.generate(&job.prompt).await;
        if let Err(err) = &result {
            error!(worker_id, %err, "generation attempt failed");
        }
        // Requester may have gone away by now; nothing to do about it
        let _ = job.respond_to.send(result);
    }
    debug!(worker_id, "generation worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoGenerator;

    #[async_trait]
    impl StoryGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl StoryGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Err(GenerationError::EmptyContent)
        }
    }

    #[tokio::test]
    async fn round_trips_a_job_through_the_pool() {
        let pool = GenerationPool::spawn(Arc::new(EchoGenerator), 2, 8);
        let out = pool.generate("hello".to_string()).await.unwrap();
        assert_eq!(out, "echo: hello");
    }

    #[tokio::test]
    async fn propagates_generator_errors() {
        let pool = GenerationPool::spawn(Arc::new(FailingGenerator), 1, 8);
        let err = pool.generate("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyContent));
    }

    #[tokio::test]
    async fn serves_many_queued_jobs() {
        let pool = GenerationPool::spawn(Arc::new(EchoGenerator), 4, 8);
        let mut handles = Vec::new();
        for i in 0..20 {
            let pool = pool.clone();
            handles.push(tokio::spawn(
                async move { pool.generate(format!("job {i}")).await },
            ));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap().unwrap(), format!("echo: job {i}"));
        }
    }
}
