//! Retrying correction use case

use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::correction::{
    preview, CorrectionFailure, CorrectionOutcome, CorrectionRequest, ErrorKind, RetryPolicy,
};

use super::ports::{Corrector, Delay};

/// Wraps a [`Corrector`] in a bounded retry loop.
///
/// Every invocation resolves to exactly one [`CorrectionOutcome`]; failures
/// never propagate as errors. Backoff waits go through the [`Delay`] port.
pub struct RetryingCorrectionService<R, D>
where
    R: Corrector,
    D: Delay,
{
    client: R,
    delay: D,
    policy: RetryPolicy,
    credential: Option<String>,
    attempt_timeout: Option<Duration>,
}

impl<R, D> RetryingCorrectionService<R, D>
where
    R: Corrector,
    D: Delay,
{
    /// Create a service using the configured credential, if any
    pub fn new(client: R, delay: D, credential: Option<String>) -> Self {
        Self {
            client,
            delay,
            policy: RetryPolicy::default(),
            credential: credential.filter(|c| !c.trim().is_empty()),
            attempt_timeout: None,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bound each attempt; expiry counts as a retryable timeout
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Correct `text`, returning `None` on empty input or definitive failure.
    ///
    /// `credential` overrides the configured one for this call only.
    pub async fn get_corrected_text(
        &self,
        text: Option<&str>,
        credential: Option<&str>,
    ) -> Option<String> {
        let request = CorrectionRequest::new(text?)?;
        self.correct(&request, credential).await.into_text()
    }

    /// Run the retry loop for one request
    pub async fn correct(
        &self,
        request: &CorrectionRequest,
        credential: Option<&str>,
    ) -> CorrectionOutcome {
        let credential = credential
            .filter(|c| !c.trim().is_empty())
            .or(self.credential.as_deref());
        let Some(credential) = credential else {
            error!("No API key configured, skipping correction");
            return CorrectionOutcome::failure(ErrorKind::AuthenticationFailure);
        };

        info!(text = %request.preview(), "Requesting correction");

        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;
        loop {
            let failure = match self.attempt_once(request, credential).await {
                Ok(corrected) if corrected.trim().is_empty() => {
                    error!(attempt = attempt + 1, "Correction service returned no text");
                    return CorrectionOutcome::failure(ErrorKind::EmptyResponse);
                }
                Ok(corrected) => {
                    info!(
                        attempt = attempt + 1,
                        text = %preview(&corrected),
                        "Correction received"
                    );
                    return CorrectionOutcome::Success {
                        corrected_text: corrected,
                    };
                }
                Err(failure) => failure,
            };

            warn!(
                attempt = attempt + 1,
                max_attempts,
                kind = %failure.kind,
                error = %failure.message,
                "Correction attempt failed"
            );

            match self.policy.delay_for(attempt, failure.kind) {
                Some(wait) => {
                    info!(wait_ms = wait.as_millis() as u64, "Retrying correction");
                    self.delay.wait(wait).await;
                    attempt += 1;
                }
                None => {
                    if failure.is_retryable() {
                        error!(kind = %failure.kind, "Correction failed after {} attempts", attempt + 1);
                    } else {
                        error!(kind = %failure.kind, "Correction failed with a non-retryable error");
                    }
                    return CorrectionOutcome::failure(failure.kind);
                }
            }
        }
    }

    async fn attempt_once(
        &self,
        request: &CorrectionRequest,
        credential: &str,
    ) -> Result<String, CorrectionFailure> {
        let call = self.client.attempt(request, credential);
        match self.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                CorrectionFailure::timeout(format!(
                    "no response within {} ms",
                    limit.as_millis()
                ))
            })?,
            None => call.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Replays scripted results, then keeps repeating the last one
    struct ScriptedCorrector {
        script: Mutex<VecDeque<Result<String, CorrectionFailure>>>,
        calls: AtomicU32,
        credentials: Mutex<Vec<String>>,
    }

    impl ScriptedCorrector {
        fn new(script: Vec<Result<String, CorrectionFailure>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
                credentials: Mutex::new(Vec::new()),
            }
        }

        fn always_failing(message: &str) -> Self {
            Self::new(vec![Err(CorrectionFailure::classified(message))])
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Corrector for ScriptedCorrector {
        async fn attempt(
            &self,
            _request: &CorrectionRequest,
            credential: &str,
        ) -> Result<String, CorrectionFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.credentials.lock().unwrap().push(credential.to_string());
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        }
    }

    #[async_trait]
    impl Corrector for &ScriptedCorrector {
        async fn attempt(
            &self,
            request: &CorrectionRequest,
            credential: &str,
        ) -> Result<String, CorrectionFailure> {
            (**self).attempt(request, credential).await
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Delay for &RecordingDelay {
        async fn wait(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    struct HangingCorrector;

    #[async_trait]
    impl Corrector for HangingCorrector {
        async fn attempt(
            &self,
            _request: &CorrectionRequest,
            _credential: &str,
        ) -> Result<String, CorrectionFailure> {
            std::future::pending().await
        }
    }

    fn request(text: &str) -> CorrectionRequest {
        CorrectionRequest::new(text).unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[tokio::test]
    async fn success_on_first_attempt() {
        let client = ScriptedCorrector::new(vec![Ok("este texto contém erro".to_string())]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-test".into()));

        let outcome = service.correct(&request("este testo contem erro"), None).await;

        assert_eq!(
            outcome,
            CorrectionOutcome::Success {
                corrected_text: "este texto contém erro".to_string()
            }
        );
        assert_eq!(client.calls(), 1);
        assert!(delay.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn connection_failures_exhaust_attempts() {
        let client = ScriptedCorrector::always_failing("Connection refused");
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-test".into()));

        let result = service.get_corrected_text(Some("texto"), None).await;

        assert_eq!(result, None);
        assert_eq!(client.calls(), 3);
        assert_eq!(*delay.waits.lock().unwrap(), vec![secs(2), secs(4)]);
    }

    #[tokio::test]
    async fn rate_limit_uses_doubled_backoff() {
        let client = ScriptedCorrector::always_failing("Error code: 429 - Rate limit reached");
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-test".into()));

        let outcome = service.correct(&request("texto"), None).await;

        assert_eq!(
            outcome,
            CorrectionOutcome::Failure {
                kind: ErrorKind::RateLimited,
                retryable: true
            }
        );
        assert_eq!(client.calls(), 3);
        assert_eq!(*delay.waits.lock().unwrap(), vec![secs(4), secs(8)]);
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let client = ScriptedCorrector::always_failing("Error code: 401 - Incorrect API key");
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-bad".into()));

        let outcome = service.correct(&request("texto"), None).await;

        assert_eq!(
            outcome,
            CorrectionOutcome::Failure {
                kind: ErrorKind::AuthenticationFailure,
                retryable: false
            }
        );
        assert_eq!(client.calls(), 1);
        assert!(delay.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_failure_fails_fast() {
        let client = ScriptedCorrector::always_failing("KeyError: 'choices'");
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-test".into()));

        assert_eq!(service.get_corrected_text(Some("texto"), None).await, None);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn success_after_transient_failure() {
        let client = ScriptedCorrector::new(vec![
            Err(CorrectionFailure::classified("503 Service Unavailable")),
            Ok("corrigido".to_string()),
        ]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-test".into()));

        let result = service.get_corrected_text(Some("texto"), None).await;

        assert_eq!(result, Some("corrigido".to_string()));
        assert_eq!(client.calls(), 2);
        assert_eq!(*delay.waits.lock().unwrap(), vec![secs(2)]);
    }

    #[tokio::test]
    async fn blank_result_is_empty_response() {
        let client = ScriptedCorrector::new(vec![Ok("   ".to_string()), Ok("late".to_string())]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-test".into()));

        let outcome = service.correct(&request("texto"), None).await;

        assert_eq!(outcome, CorrectionOutcome::failure(ErrorKind::EmptyResponse));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let client = ScriptedCorrector::new(vec![Ok("never".to_string())]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, None);

        assert_eq!(service.get_corrected_text(Some(""), None).await, None);
        assert_eq!(service.get_corrected_text(None, None).await, None);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_short_circuits() {
        let client = ScriptedCorrector::new(vec![Ok("never".to_string())]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("  ".into()));

        assert!(!service.has_credential());
        let outcome = service.correct(&request("texto"), None).await;
        assert_eq!(
            outcome,
            CorrectionOutcome::failure(ErrorKind::AuthenticationFailure)
        );
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn override_credential_is_passed_to_client() {
        let client = ScriptedCorrector::new(vec![Ok("ok".to_string())]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk-config".into()));

        service.get_corrected_text(Some("a"), Some("sk-once")).await;
        service.get_corrected_text(Some("b"), None).await;

        assert_eq!(
            *client.credentials.lock().unwrap(),
            vec!["sk-once".to_string(), "sk-config".to_string()]
        );
    }

    #[tokio::test]
    async fn override_works_without_configured_credential() {
        let client = ScriptedCorrector::new(vec![Ok("ok".to_string())]);
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, None);

        assert_eq!(
            service.get_corrected_text(Some("a"), Some("sk-once")).await,
            Some("ok".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn hung_attempt_times_out_and_is_retried() {
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(HangingCorrector, &delay, Some("sk".into()))
            .with_attempt_timeout(Duration::from_secs(30));

        let outcome = service.correct(&request("texto"), None).await;

        assert_eq!(
            outcome,
            CorrectionOutcome::Failure {
                kind: ErrorKind::Timeout,
                retryable: true
            }
        );
        assert_eq!(*delay.waits.lock().unwrap(), vec![secs(2), secs(4)]);
    }

    #[tokio::test]
    async fn custom_policy_limits_attempts() {
        let client = ScriptedCorrector::always_failing("network unreachable");
        let delay = RecordingDelay::default();
        let service = RetryingCorrectionService::new(&client, &delay, Some("sk".into()))
            .with_policy(RetryPolicy::new(2, Duration::from_millis(10)));

        assert_eq!(service.get_corrected_text(Some("x"), None).await, None);
        assert_eq!(client.calls(), 2);
        assert_eq!(
            *delay.waits.lock().unwrap(),
            vec![Duration::from_millis(10)]
        );
    }
}
