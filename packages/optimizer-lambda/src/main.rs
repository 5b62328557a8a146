mod handler;
mod logging;

use std::sync::Arc;

use lambda_runtime::{Error, run, service_fn};
use optimizer_core::{OptimizerConfig, Pipeline, S3Config, S3ObjectStore, create_s3_client};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init_logging()?;

    // 設定は起動時に一度だけ読み込む。不正なら 1 件も処理せずに終了する
    let config = OptimizerConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    })?;

    tracing::info!(
        source_bucket = %config.source_bucket,
        destination_bucket = %config.destination_bucket,
        marker = ?config.key_marker,
        jpeg_quality = config.jpeg_quality.value(),
        png_compression = ?config.png_compression,
        delete_on_success = config.delete_on_success,
        unsupported_policy = ?config.unsupported_policy,
        "optimizer configured"
    );

    let client = create_s3_client(&S3Config::from_env()).await;
    let pipeline = Pipeline::new(config, Arc::new(S3ObjectStore::new(client)))?;

    run(service_fn(|event| handler::handle(&pipeline, event))).await
}
