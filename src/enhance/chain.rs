use async_trait::async_trait;
use tracing::{info, warn};

use super::GatewayError;

/// One way of asking the text generator for output.
#[async_trait]
pub trait Attempt: Send + Sync {
    fn name(&self) -> &'static str;
    async fn call(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Ordered attempts, tried one after another until one returns.
///
/// There is no retry of a single attempt and no backoff between them.
pub struct FallbackChain {
    attempts: Vec<Box<dyn Attempt>>,
}

impl FallbackChain {
    pub fn new(attempts: Vec<Box<dyn Attempt>>) -> Self {
        Self { attempts }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.attempts.iter().map(|a| a.name()).collect()
    }

    pub async fn run(&self, prompt: &str) -> Result<String, GatewayError> {
        for attempt in &self.attempts {
            match attempt.call(prompt).await {
                Ok(text) => {
                    info!(attempt = attempt.name(), "enhancement attempt succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(attempt = attempt.name(), error = %e, "enhancement attempt failed");
                }
            }
        }
        Err(GatewayError::Exhausted {
            attempts: self.attempts.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAttempt;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn first_success_short_circuits() {
        let first = ScriptedAttempt::failing("one");
        let second = ScriptedAttempt::ok("two", "from two");
        let third = ScriptedAttempt::ok("three", "from three");
        let (c1, c2, c3) = (first.calls(), second.calls(), third.calls());

        let chain = FallbackChain::new(vec![Box::new(first), Box::new(second), Box::new(third)]);
        assert_eq!(chain.run("prompt").await.unwrap(), "from two");
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_text_still_counts_as_a_response() {
        let chain = FallbackChain::new(vec![
            Box::new(ScriptedAttempt::ok("blank", "")),
            Box::new(ScriptedAttempt::ok("never", "unused")),
        ]);
        assert_eq!(chain.run("prompt").await.unwrap(), "");
    }

    #[tokio::test]
    async fn every_attempt_runs_once_before_giving_up() {
        let attempts: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(ScriptedAttempt::failing)
            .collect();
        let counters: Vec<_> = attempts.iter().map(|a| a.calls()).collect();
        let chain = FallbackChain::new(
            attempts
                .into_iter()
                .map(|a| Box::new(a) as Box<dyn Attempt>)
                .collect(),
        );

        let err = chain.run("prompt").await.unwrap_err();
        assert!(matches!(err, GatewayError::Exhausted { attempts: 4 }));
        assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }
}
