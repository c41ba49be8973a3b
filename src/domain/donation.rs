//! Donation records and the tagged payload collected by the wizard.

use serde::{Deserialize, Serialize};

/// Largest accepted PDF upload (5 MiB).
pub const MAX_PDF_BYTES: usize = 5 * 1024 * 1024;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationType {
    Book,
    Pdf,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::Book => "book",
            DonationType::Pdf => "pdf",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "book" => Some(DonationType::Book),
            "pdf" => Some(DonationType::Pdf),
            _ => None,
        }
    }

    /// Status a freshly created record starts in.
    pub fn initial_status(&self) -> DonationStatus {
        match self {
            DonationType::Book => DonationStatus::PickupScheduled,
            DonationType::Pdf => DonationStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    PickupScheduled,
    Completed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::PickupScheduled => "pickup_scheduled",
            DonationStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(DonationStatus::Pending),
            "pickup_scheduled" => Some(DonationStatus::PickupScheduled),
            "completed" => Some(DonationStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonatedBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupAddress {
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// A file picked by the donor, held in memory until submission.
#[derive(Clone, PartialEq)]
pub struct PdfFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PdfFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

impl std::fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Type-specific part of a donation.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationDetails {
    Book {
        books: Vec<DonatedBook>,
        pickup: PickupAddress,
    },
    Pdf {
        title: String,
        author: String,
        description: Option<String>,
        file: PdfFile,
    },
}

impl DonationDetails {
    pub fn donation_type(&self) -> DonationType {
        match self {
            DonationDetails::Book { .. } => DonationType::Book,
            DonationDetails::Pdf { .. } => DonationType::Pdf,
        }
    }
}

/// Everything collected by the wizard, ready for the submission pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationSubmission {
    pub donor_name: String,
    pub donor_email: String,
    pub details: DonationDetails,
}

/// Parent record as inserted in step one of the pipeline.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_name: String,
    pub donor_email: String,
    pub donation_type: DonationType,
    pub status: DonationStatus,
    pub pickup: Option<PickupAddress>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
}

impl From<&DonationSubmission> for NewDonation {
    fn from(submission: &DonationSubmission) -> Self {
        let donation_type = submission.details.donation_type();
        let (pickup, title, author, description) = match &submission.details {
            DonationDetails::Book { pickup, .. } => (Some(pickup.clone()), None, None, None),
            DonationDetails::Pdf {
                title,
                author,
                description,
                ..
            } => (
                None,
                Some(title.clone()),
                Some(author.clone()),
                description.clone(),
            ),
        };
        Self {
            donor_name: submission.donor_name.trim().to_string(),
            donor_email: submission.donor_email.trim().to_string(),
            donation_type,
            status: donation_type.initial_status(),
            pickup,
            title,
            author,
            description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub file_url: String,
    pub file_name: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub donor_email: String,
    pub donation_type: DonationType,
    pub status: DonationStatus,
    pub pickup: Option<PickupAddress>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub file: Option<FileAttachment>,
    pub created_at: String,
}
