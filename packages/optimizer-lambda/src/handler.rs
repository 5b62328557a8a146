use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;

use optimizer_core::{DEADLINE_SAFETY_MARGIN, Deadline, Outcome, Pipeline, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Failed,
}

/// 呼び出し結果（失敗してもプラットフォームにはリトライを要求しない）
#[derive(Debug, Serialize)]
pub struct InvocationReport {
    pub status: Status,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn handle(
    pipeline: &Pipeline,
    event: LambdaEvent<S3Event>,
) -> Result<InvocationReport, Error> {
    let (payload, context) = event.into_parts();
    let deadline = Deadline::from_epoch_millis(context.deadline, DEADLINE_SAFETY_MARGIN);

    let report = match pipeline.handle_event(&payload, deadline).await {
        Ok(outcome) => {
            tracing::info!(
                request_id = %context.request_id,
                source = %outcome.source,
                location = ?outcome.location(),
                cleanup = ?outcome.cleanup,
                "SUCCESS"
            );
            InvocationReport {
                status: Status::Ok,
                request_id: context.request_id,
                outcome: Some(outcome),
                error_kind: None,
                error: None,
            }
        }
        Err(err) => {
            let kind = log_failure(&context.request_id, &err);
            InvocationReport {
                status: Status::Failed,
                request_id: context.request_id,
                outcome: None,
                error_kind: Some(kind),
                error: Some(err.to_string()),
            }
        }
    };

    Ok(report)
}

/// 失敗を分類してログに残す
fn log_failure(request_id: &str, err: &PipelineError) -> &'static str {
    let kind = match err {
        PipelineError::Config(_) => "config",
        PipelineError::Event(_) => "event",
        PipelineError::Unsupported { .. } => "unsupported",
        PipelineError::Staging(_) => "staging",
        PipelineError::Fetch { .. } => "fetch",
        PipelineError::Decode { .. } => "decode",
        PipelineError::Encode { .. } => "encode",
        PipelineError::Upload { .. } => "upload",
        PipelineError::Copy { .. } => "copy",
        PipelineError::Timeout { .. } => "timeout",
    };

    match err {
        // 入力側の問題はリトライしても変わらない
        PipelineError::Event(_) | PipelineError::Unsupported { .. } | PipelineError::Decode { .. } => {
            tracing::warn!(request_id = %request_id, kind, error = %err, "object not processed");
        }
        _ => {
            tracing::error!(request_id = %request_id, kind, error = %err, "invocation failed");
        }
    }

    kind
}
