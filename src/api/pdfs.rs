use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::io::ErrorKind;
use std::path::Path;

use crate::infrastructure::AppState;

/// File names ending in `.pdf` directly inside `dir`, sorted. A missing
/// directory lists as empty.
pub async fn pdf_file_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_ascii_lowercase().ends_with(".pdf") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[utoipa::path(
    get,
    path = "/api/list-pdfs",
    responses(
        (status = 200, description = "Names of the PDFs available for reading")
    )
)]
pub async fn list_pdfs(State(state): State<AppState>) -> impl IntoResponse {
    match pdf_file_names(&state.config.pdf_dir).await {
        Ok(pdfs) => (StatusCode::OK, Json(json!({ "pdfs": pdfs }))).into_response(),
        Err(e) => {
            tracing::error!("Failed to list {:?}: {}", state.config.pdf_dir, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to read PDF directory" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_pdfs_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zeta.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("Alpha.PDF"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let names = pdf_file_names(dir.path()).await.unwrap();
        assert_eq!(names, vec!["Alpha.PDF".to_string(), "zeta.pdf".to_string()]);
    }

    #[tokio::test]
    async fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let names = pdf_file_names(&dir.path().join("absent")).await.unwrap();
        assert!(names.is_empty());
    }
}
