use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::analysis::audio_format::AudioFormat;
use crate::errors::AppError;

pub fn clip_key(user_id: Uuid, analysis_id: Uuid, format: AudioFormat) -> String {
    format!("audio/{user_id}/{analysis_id}.{}", format.as_str())
}

/// Uploads a recorded clip under `key`.
pub async fn upload_clip(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    format: AudioFormat,
    bytes: Bytes,
) -> Result<(), AppError> {
    let size = bytes.len();
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .content_type(format.content_type())
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed for {key}: {e}")))?;

    info!("Uploaded clip {key} ({size} bytes)");
    Ok(())
}

/// Removes a clip whose analysis row was never written.
pub async fn delete_clip(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 delete failed for {key}: {e}")))?;

    info!("Deleted clip {key}");
    Ok(())
}
