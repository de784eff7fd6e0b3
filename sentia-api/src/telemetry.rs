//! Execution telemetry: timing envelope and resource sampling
//!
//! Every analysis call is wrapped in [`wrap`], which times the work,
//! samples process resources and stamps the telemetry record. Telemetry is
//! only produced for successful calls; a failing model call propagates its
//! error and leaves no partial record behind, so persisted telemetry always
//! pairs with a successful prediction.

use chrono::Utc;
use std::future::Future;
use std::time::Instant;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, MINIMUM_CPU_UPDATE_INTERVAL};

use sentia_common::api::types::ExecutionInfo;
use sentia_common::Result;

/// Sample resident set size (bytes) and CPU utilization (percent) of the
/// current process.
///
/// CPU usage needs two refreshes separated by a short interval to yield a
/// non-zero reading, so this call holds the request for that interval; the
/// sleep is an await point, other requests keep running. Resource telemetry
/// is best-effort: if the OS denies process introspection this returns
/// zeroed values instead of failing the request.
pub async fn sample_resources() -> (u64, f32) {
    let pid = Pid::from_u32(std::process::id());
    let refresh_kind = ProcessRefreshKind::nothing().with_cpu().with_memory();

    let mut system = System::new();
    if system.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), true, refresh_kind)
        == 0
    {
        tracing::debug!("Process introspection unavailable, reporting zeroed resource usage");
        return (0, 0.0);
    }

    tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    system.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), true, refresh_kind);

    match system.process(pid) {
        Some(process) => (process.memory(), process.cpu_usage()),
        None => (0, 0.0),
    }
}

/// Run `work` exactly once and pair its successful result with a fully
/// populated telemetry record.
///
/// `text` is the original input (length is measured in characters, not
/// bytes); `model_version` identifies the model(s) invoked. When `work`
/// fails the error is returned as-is and no telemetry is assembled.
pub async fn wrap<T, F, Fut>(
    text: &str,
    model_version: &str,
    work: F,
) -> Result<(T, ExecutionInfo)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let value = work().await?;
    let execution_time = started.elapsed().as_secs_f64();

    let (memory_usage, cpu_usage) = sample_resources().await;

    let info = ExecutionInfo {
        execution_time,
        prediction_datetime: Utc::now().to_rfc3339(),
        text_length: text.chars().count() as u64,
        model_version: model_version.to_string(),
        memory_usage,
        cpu_usage,
    };

    Ok((value, info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentia_common::Error;
    use std::time::Duration;

    #[tokio::test]
    async fn wrap_populates_telemetry_on_success() {
        let (value, info) = wrap("hola mundo", "test-model", || async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(42)
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert!(info.execution_time >= 0.02);
        assert_eq!(info.text_length, 10);
        assert_eq!(info.model_version, "test-model");
        assert!(!info.prediction_datetime.is_empty());
    }

    #[tokio::test]
    async fn wrap_propagates_failure_without_telemetry() {
        let result: Result<(u32, ExecutionInfo)> = wrap("texto", "test-model", || async {
            Err(Error::ModelUnavailable("stub failure".to_string()))
        })
        .await;

        assert!(matches!(result, Err(Error::ModelUnavailable(_))));
    }

    #[tokio::test]
    async fn text_length_counts_characters_not_bytes() {
        let (_, info) = wrap("añoño", "m", || async { Ok(()) }).await.unwrap();
        assert_eq!(info.text_length, 5);

        let (_, info) = wrap("", "m", || async { Ok(()) }).await.unwrap();
        assert_eq!(info.text_length, 0);
    }

    #[tokio::test]
    async fn resource_sample_never_fails() {
        let (memory, cpu) = sample_resources().await;
        // On a normal OS both readings are available; on a locked-down one
        // they degrade to zero. Either way the call succeeds.
        let _ = memory;
        assert!(cpu >= 0.0);
    }
}
