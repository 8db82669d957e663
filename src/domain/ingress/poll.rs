// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded fixed-interval polling

use crate::shared::error::IngressError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::info;

/// Polls `probe` until it reports ready, logging a single waiting notice.
pub async fn poll_until<F, Fut>(
    timeout: Duration,
    interval: Duration,
    waiting_notice: &str,
    probe: F,
) -> Result<bool, IngressError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, IngressError>>,
{
    poll_until_with_notice(timeout, interval, probe, || {
        info!("{}", waiting_notice);
    })
    .await
}

/// Calls `probe` now and then every `interval` until it returns `Ok(true)`.
///
/// A probe error ends polling immediately. Once `timeout` has elapsed the call
/// fails with [`IngressError::Timeout`], so the probe runs at most
/// `ceil(timeout / interval) + 1` times. `on_waiting` runs on the first
/// not-ready result only.
pub async fn poll_until_with_notice<F, Fut, N>(
    timeout: Duration,
    interval: Duration,
    mut probe: F,
    on_waiting: N,
) -> Result<bool, IngressError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, IngressError>>,
    N: FnOnce(),
{
    let deadline = Instant::now() + timeout;
    let mut on_waiting = Some(on_waiting);

    loop {
        if probe().await? {
            return Ok(true);
        }

        if let Some(notify) = on_waiting.take() {
            notify();
        }

        if Instant::now() >= deadline {
            return Err(IngressError::Timeout(format!(
                "condition not met within {}s",
                timeout.as_secs_f64()
            )));
        }

        sleep(interval).await;
    }
}
