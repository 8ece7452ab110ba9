use crate::application::contracts::artifact::ArtifactLocation;
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302` to the mirrored copy, or the PDF bytes as an attachment.
pub fn artifact_response(location: ArtifactLocation) -> Response {
    match location {
        ArtifactLocation::Remote(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        ArtifactLocation::Local { file_name, bytes } => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ],
            bytes,
        )
            .into_response(),
    }
}
