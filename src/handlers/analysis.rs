use base64::{engine::general_purpose, Engine};
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{AnalyzeMealRequest, AnalyzeMealResponse};
use crate::sanitizer::sanitize_vision_analysis_result;
use crate::services::VisionProvider;

pub struct AnalysisHandler {
    provider: Arc<dyn VisionProvider>,
}

impl AnalysisHandler {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    /// Photo → provider → sanitizer. The only client-visible rejection of a
    /// well-formed request is "not food".
    pub async fn analyze_meal(&self, request: &AnalyzeMealRequest) -> Result<AnalyzeMealResponse, AppError> {
        let image = decode_image(&request.image_base64)?;
        let mime_type = resolve_mime_type(request.mime_type.as_deref(), &image)?;

        log::info!("📸 Analyzing meal photo ({} bytes, {})", image.len(), mime_type);

        let raw = self.provider.analyze_meal_image(&image, mime_type).await?;
        let analysis = sanitize_vision_analysis_result(&raw)?;

        log::info!(
            "✅ Meal analyzed: {} foods, {} kcal",
            analysis.foods.len(),
            analysis.total_nutrition.calories
        );

        Ok(AnalyzeMealResponse {
            success: true,
            analysis,
        })
    }
}

/// Accepts bare base64 or a `data:<mime>;base64,` URL
fn decode_image(encoded: &str) -> Result<Vec<u8>, AppError> {
    let encoded = encoded.trim();
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AppError::InvalidRequest(format!("image_base64 is not valid base64: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::InvalidRequest("image_base64 is empty".to_string()));
    }
    Ok(bytes)
}

/// Client-declared type wins; otherwise sniff the magic bytes
fn resolve_mime_type<'a>(declared: Option<&'a str>, image: &[u8]) -> Result<&'a str, AppError> {
    if let Some(mime) = declared.map(str::trim).filter(|m| !m.is_empty()) {
        if !mime.starts_with("image/") {
            return Err(AppError::InvalidRequest(format!("Unsupported mime type: {}", mime)));
        }
        return Ok(mime);
    }

    let sniffed = if image.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if image.len() >= 12 && &image[..4] == b"RIFF" && &image[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg" // default
    };
    Ok(sniffed)
}
