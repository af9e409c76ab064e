// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry an async operation with exponential backoff. Used for the
/// graph-indexer and relayer HTTP calls, which fail transiently.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut op: F,
    attempts: usize,
    initial_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut delay = initial_delay;
    let mut remaining = attempts.max(1);
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                remaining -= 1;
                if remaining == 0 {
                    return Err(e);
                }
                sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}
