//! Suspension port

use std::time::Duration;

use async_trait::async_trait;

/// Port for waiting between steps (retry backoff, clipboard settling)
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

#[async_trait]
impl Delay for Box<dyn Delay> {
    async fn wait(&self, duration: Duration) {
        self.as_ref().wait(duration).await
    }
}
