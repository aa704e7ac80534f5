/// Bounded retry-with-delay polling
///
/// Used after on-chain confirmation to wait for the backend to index the
/// trade. Each attempt sleeps first, then probes. "Not there yet" uses up
/// an attempt; a probe error ends the loop and is returned.
use crate::errors::BackendError;
use crate::logger::{self, LogTag};
use crate::ports::{Sleeper, TradeBackend};
use crate::types::{TradeRecord, TxHash};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult<T> {
    Found { value: T, attempts: u32 },
    Exhausted { attempts: u32 },
}

impl RetryPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Run `probe` until it yields a value or the attempt budget is spent
    pub async fn poll<T, E, F, Fut>(
        &self,
        sleeper: &dyn Sleeper,
        label: &str,
        mut probe: F,
    ) -> Result<PollResult<T>, E>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        for attempt in 1..=self.max_attempts {
            sleeper.sleep(self.interval).await;

            match probe(attempt).await {
                Ok(Some(value)) => {
                    return Ok(PollResult::Found {
                        value,
                        attempts: attempt,
                    })
                }
                Ok(None) => {
                    logger::debug(
                        LogTag::Trade,
                        &format!("{}: attempt {}/{} found nothing", label, attempt, self.max_attempts),
                    );
                }
                Err(e) => {
                    logger::warning(
                        LogTag::Trade,
                        &format!("{}: attempt {}/{} failed: {}", label, attempt, self.max_attempts, e),
                    );
                    return Err(e);
                }
            }
        }

        Ok(PollResult::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Match predicate: a record belongs to the submitted transaction
pub fn record_matches(record: &TradeRecord, hash: &TxHash) -> bool {
    hash.matches(&record.txn_hash)
}

/// Poll the backend trade listing for `hash`
pub async fn find_trade_record(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    backend: &dyn TradeBackend,
    token_address: &str,
    hash: &TxHash,
    limit: u32,
) -> Result<PollResult<TradeRecord>, BackendError> {
    policy
        .poll(sleeper, "trade record lookup", |_| async move {
            let trades = backend.list_trades(token_address, limit).await?;
            Ok::<_, BackendError>(trades.into_iter().find(|record| record_matches(record, hash)))
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_record, FakeTradeBackend, RecordingSleeper};

    fn policy() -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(500), 20)
    }

    #[tokio::test]
    async fn test_found_on_third_attempt_case_insensitive() {
        let backend = FakeTradeBackend::default();
        backend.push_ok(vec![]);
        backend.push_ok(vec![sample_record("0xother")]);
        backend.push_ok(vec![sample_record("0xother"), sample_record("0xABCDEF")]);
        let sleeper = RecordingSleeper::default();

        let result = find_trade_record(
            &policy(),
            &sleeper,
            &backend,
            "0xtoken",
            &TxHash::new("0xabcdef"),
            10,
        )
        .await
        .unwrap();

        match result {
            PollResult::Found { value, attempts } => {
                assert_eq!(value.txn_hash, "0xABCDEF");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected a match, got {:?}", other),
        }
        assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(500); 3]);
        assert_eq!(backend.calls(), vec![("0xtoken".to_string(), 10); 3]);
    }

    #[tokio::test]
    async fn test_exhausted_after_budget() {
        let backend = FakeTradeBackend::default();
        backend.push_ok(vec![sample_record("0xother")]);
        let sleeper = RecordingSleeper::default();

        let result = find_trade_record(&policy(), &sleeper, &backend, "0xtoken", &TxHash::new("0x1"), 10)
            .await
            .unwrap();

        assert_eq!(result, PollResult::Exhausted { attempts: 20 });
        assert_eq!(sleeper.sleeps().len(), 20);
        assert_eq!(backend.calls().len(), 20);
    }

    #[tokio::test]
    async fn test_backend_error_stops_lookup() {
        let backend = FakeTradeBackend::default();
        backend.push_ok(vec![]);
        backend.push_err("connection refused");
        backend.push_ok(vec![sample_record("0x1")]);
        let sleeper = RecordingSleeper::default();

        let result = find_trade_record(&policy(), &sleeper, &backend, "0xtoken", &TxHash::new("0x1"), 10).await;

        assert!(matches!(result, Err(BackendError::Unavailable(ref m)) if m == "connection refused"));
        assert_eq!(backend.calls().len(), 2);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_budget_never_probes() {
        let sleeper = RecordingSleeper::default();
        let result = RetryPolicy::new(Duration::from_secs(1), 0)
            .poll(&sleeper, "noop", |_| async { Ok::<_, String>(Some(())) })
            .await;
        assert_eq!(result, Ok(PollResult::Exhausted { attempts: 0 }));
        assert!(sleeper.sleeps().is_empty());
    }
}
