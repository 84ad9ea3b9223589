//! Tokio-backed delay adapter

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::Delay;

/// Waits with `tokio::time::sleep`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
