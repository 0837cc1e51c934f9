//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline
//! - Cancel the wrapped future cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other upstream errors

use std::future::Future;
use std::time::Duration;

use crate::error::{ProxyError, ProxyResult};

/// Run `fut` with a deadline, mapping expiry to [`ProxyError::Timeout`].
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> ProxyResult<T>
where
    F: Future<Output = ProxyResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(ProxyError::Timeout(deadline.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let result = with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_expires() {
        let result: ProxyResult<()> = with_deadline(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(ProxyError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: ProxyResult<()> = with_deadline(Duration::from_secs(1), async {
            Err(ProxyError::InvalidTarget("x"))
        })
        .await;
        assert!(matches!(result, Err(ProxyError::InvalidTarget("x"))));
    }
}
