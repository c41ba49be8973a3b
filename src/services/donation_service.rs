//! Donation Service - submission pipeline for completed wizard payloads
//!
//! Steps: create the parent record, then either upload the PDF and attach
//! it, or insert the donated book rows. A failure after the record exists
//! deletes it again along with any uploaded file, so no partial donation
//! stays visible.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{
    BlobStorage, DonatedBook, Donation, DonationDetails, DonationRepository, DonationStatus,
    DonationSubmission, DomainError, FileAttachment, NewDonation, PdfFile,
};

/// Bucket that donated PDFs are uploaded to
pub const DONATION_BUCKET: &str = "donated-pdfs";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationReceipt {
    pub donation_id: String,
    pub status: DonationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// Post-submission notification (e.g. a thank-you email). Failures are
/// logged and never fail the submission.
#[async_trait]
pub trait DonationNotifier: Send + Sync {
    async fn donation_received(&self, donation: &Donation) -> Result<(), DomainError>;
}

/// Notifier that only records the event in the log
pub struct LogNotifier;

#[async_trait]
impl DonationNotifier for LogNotifier {
    async fn donation_received(&self, donation: &Donation) -> Result<(), DomainError> {
        tracing::info!(
            "Donation {} ({}) received from {}",
            donation.id,
            donation.donation_type.as_str(),
            donation.donor_email
        );
        Ok(())
    }
}

pub struct DonationService {
    donations: Arc<dyn DonationRepository>,
    blobs: Arc<dyn BlobStorage>,
    notifier: Arc<dyn DonationNotifier>,
}

impl DonationService {
    pub fn new(donations: Arc<dyn DonationRepository>, blobs: Arc<dyn BlobStorage>) -> Self {
        Self {
            donations,
            blobs,
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn DonationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub async fn find(&self, donation_id: &str) -> Result<Option<Donation>, DomainError> {
        self.donations.find_by_id(donation_id).await
    }

    pub async fn donated_books(&self, donation_id: &str) -> Result<Vec<DonatedBook>, DomainError> {
        self.donations.donated_books(donation_id).await
    }

    pub async fn submit(
        &self,
        submission: DonationSubmission,
    ) -> Result<DonationReceipt, DomainError> {
        let donation = self
            .donations
            .create(NewDonation::from(&submission))
            .await?;
        tracing::debug!("Created donation record {}", donation.id);

        let completed = match self.complete(&donation, &submission.details).await {
            Ok(completed) => completed,
            Err(e) => {
                tracing::warn!("Donation {} failed mid-pipeline: {}", donation.id, e);
                self.rollback(&donation.id, &submission.details).await;
                return Err(e);
            }
        };

        if let Err(e) = self.notifier.donation_received(&completed).await {
            tracing::warn!(
                "Failed to send notification for donation {}: {}",
                completed.id,
                e
            );
        }

        tracing::info!(
            "Donation {} submitted with status {}",
            completed.id,
            completed.status.as_str()
        );
        Ok(DonationReceipt {
            donation_id: completed.id,
            status: completed.status,
            file_url: completed.file.map(|f| f.file_url),
        })
    }

    async fn complete(
        &self,
        donation: &Donation,
        details: &DonationDetails,
    ) -> Result<Donation, DomainError> {
        match details {
            DonationDetails::Pdf { file, .. } => {
                let attachment = self.upload(&donation.id, file).await?;
                self.donations.attach_file(&donation.id, attachment).await
            }
            DonationDetails::Book { books, .. } => {
                self.donations
                    .insert_donated_books(&donation.id, books)
                    .await?;
                Ok(donation.clone())
            }
        }
    }

    async fn upload(&self, donation_id: &str, file: &PdfFile) -> Result<FileAttachment, DomainError> {
        let file_name = storage_file_name(&file.file_name);
        let path = blob_path(donation_id, &file_name);
        let file_url = self
            .blobs
            .upload(DONATION_BUCKET, &path, &file.bytes, &file.content_type)
            .await?;

        Ok(FileAttachment {
            file_url,
            file_name,
            file_size: file.size() as u64,
        })
    }

    async fn rollback(&self, donation_id: &str, details: &DonationDetails) {
        if let DonationDetails::Pdf { file, .. } = details {
            let path = blob_path(donation_id, &storage_file_name(&file.file_name));
            match self.blobs.remove(DONATION_BUCKET, &path).await {
                Ok(()) => tracing::debug!("Removed uploaded file {}/{}", DONATION_BUCKET, path),
                // The upload itself failed
                Err(DomainError::NotFound) => {}
                Err(e) => tracing::error!(
                    "Failed to remove uploaded file {}/{}: {}",
                    DONATION_BUCKET,
                    path,
                    e
                ),
            }
        }

        match self.donations.delete(donation_id).await {
            Ok(()) => tracing::warn!("Rolled back donation {}", donation_id),
            Err(e) => tracing::error!("Failed to roll back donation {}: {}", donation_id, e),
        }
    }
}

fn blob_path(donation_id: &str, file_name: &str) -> String {
    format!("{}/{}", donation_id, file_name)
}

/// Keep the name recognisable but safe as a single path segment.
fn storage_file_name(original: &str) -> String {
    let cleaned: String = original
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "donation.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}
