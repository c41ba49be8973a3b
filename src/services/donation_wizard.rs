//! Donation Wizard - client-side state machine for the donation form
//!
//! ```text
//! ChooseType -> TypeDetails -> ContactOrPickupDetails -> Confirm -> Submitting
//!                                                                    |-> Success
//!                                                                    `-> Failed -> (retry) Confirm
//! ```
//!
//! Each step gates forward navigation; `back()` moves one form step back.

use thiserror::Error;

use crate::domain::donation::{MAX_PDF_BYTES, PDF_CONTENT_TYPE};
use crate::domain::validation::{is_blank, is_valid_email, is_valid_phone, is_valid_pincode};
use crate::domain::{
    DomainError, DonatedBook, DonationDetails, DonationSubmission, DonationType, PdfFile,
    PickupAddress,
};
use crate::services::donation_service::{DonationReceipt, DonationService};

#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    ChooseType,
    TypeDetails,
    ContactOrPickupDetails,
    Confirm,
    Submitting,
    Success { donation_id: String },
    Failed { error: String },
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::ChooseType => "choose_type",
            WizardStep::TypeDetails => "type_details",
            WizardStep::ContactOrPickupDetails => "contact_details",
            WizardStep::Confirm => "confirm",
            WizardStep::Submitting => "submitting",
            WizardStep::Success { .. } => "success",
            WizardStep::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("action not available at step '{0}'")]
    WrongStep(&'static str),
    #[error("select a donation type first")]
    TypeNotSelected,
    #[error("action only applies to {0} donations")]
    WrongType(&'static str),
    #[error("{0} is required")]
    Required(&'static str),
    #[error("book #{index}: {field} is required")]
    BookEntry { index: usize, field: &'static str },
    #[error("{0} is invalid")]
    Invalid(&'static str),
    #[error("only PDF files are accepted")]
    NotPdf,
    #[error("file is {size} bytes; the limit is 5 MB")]
    FileTooLarge { size: usize },
    #[error("select a PDF file to donate")]
    FileMissing,
    #[error("at least one book is required")]
    LastBookEntry,
    #[error("no book entry at position {0}")]
    NoSuchEntry(usize),
    #[error("submission failed: {0}")]
    Submission(#[from] DomainError),
}

/// One row of the repeatable book sub-form
#[derive(Debug, Clone, PartialEq)]
pub struct BookEntryDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub quantity: u32,
}

impl Default for BookEntryDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            quantity: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDraft {
    pub file: Option<PdfFile>,
    pub title: String,
    pub author: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDraft {
    pub donor_name: String,
    pub donor_email: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

/// Quantity input coerced to a positive integer that fits the stored
/// column; anything else becomes 1.
pub fn coerce_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<i32>() {
        Ok(n) if n > 0 => n.unsigned_abs(),
        _ => 1,
    }
}

#[derive(Debug, Clone)]
pub struct DonationWizard {
    step: WizardStep,
    donation_type: Option<DonationType>,
    books: Vec<BookEntryDraft>,
    pdf: PdfDraft,
    contact: ContactDraft,
}

impl Default for DonationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl DonationWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::ChooseType,
            donation_type: None,
            books: vec![BookEntryDraft::default()],
            pdf: PdfDraft::default(),
            contact: ContactDraft::default(),
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    pub fn donation_type(&self) -> Option<DonationType> {
        self.donation_type
    }

    pub fn books(&self) -> &[BookEntryDraft] {
        &self.books
    }

    pub fn pdf(&self) -> &PdfDraft {
        &self.pdf
    }

    pub fn contact(&self) -> &ContactDraft {
        &self.contact
    }

    /// Contact fields are only editable on their own step.
    pub fn contact_mut(&mut self) -> Result<&mut ContactDraft, WizardError> {
        self.expect_step(WizardStep::ContactOrPickupDetails)?;
        Ok(&mut self.contact)
    }

    pub fn choose_type(&mut self, donation_type: DonationType) -> Result<(), WizardError> {
        self.expect_step(WizardStep::ChooseType)?;
        self.donation_type = Some(donation_type);
        Ok(())
    }

    /// Advance one step if the current step's fields are valid.
    pub fn next(&mut self) -> Result<&WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::ChooseType => {
                if self.donation_type.is_none() {
                    return Err(WizardError::TypeNotSelected);
                }
                WizardStep::TypeDetails
            }
            WizardStep::TypeDetails => {
                self.validate_type_details()?;
                WizardStep::ContactOrPickupDetails
            }
            WizardStep::ContactOrPickupDetails => {
                self.validate_contact()?;
                WizardStep::Confirm
            }
            _ => return Err(WizardError::WrongStep(self.step.name())),
        };
        self.step = next;
        Ok(&self.step)
    }

    pub fn back(&mut self) -> Result<&WizardStep, WizardError> {
        let previous = match self.step {
            WizardStep::TypeDetails => WizardStep::ChooseType,
            WizardStep::ContactOrPickupDetails => WizardStep::TypeDetails,
            WizardStep::Confirm => WizardStep::ContactOrPickupDetails,
            _ => return Err(WizardError::WrongStep(self.step.name())),
        };
        self.step = previous;
        Ok(&self.step)
    }

    pub fn add_book_entry(&mut self) -> Result<usize, WizardError> {
        self.expect_book_details()?;
        self.books.push(BookEntryDraft::default());
        Ok(self.books.len() - 1)
    }

    pub fn remove_book_entry(&mut self, index: usize) -> Result<(), WizardError> {
        self.expect_book_details()?;
        if index >= self.books.len() {
            return Err(WizardError::NoSuchEntry(index));
        }
        if self.books.len() == 1 {
            return Err(WizardError::LastBookEntry);
        }
        self.books.remove(index);
        Ok(())
    }

    pub fn edit_book_entry(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut BookEntryDraft),
    ) -> Result<(), WizardError> {
        self.expect_book_details()?;
        let entry = self
            .books
            .get_mut(index)
            .ok_or(WizardError::NoSuchEntry(index))?;
        edit(entry);
        if entry.quantity == 0 {
            entry.quantity = 1;
        }
        Ok(())
    }

    /// Set quantity from raw form input
    pub fn set_book_quantity(&mut self, index: usize, raw: &str) -> Result<u32, WizardError> {
        let quantity = coerce_quantity(raw);
        self.edit_book_entry(index, |entry| entry.quantity = quantity)?;
        Ok(quantity)
    }

    /// Select the file to donate. A file that is not a PDF or exceeds 5 MiB
    /// is rejected and clears any previous selection. A blank title is
    /// filled from the file name.
    pub fn select_pdf(&mut self, file: PdfFile) -> Result<(), WizardError> {
        self.expect_pdf_details()?;

        let rejection = if !file.content_type.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
            Some(WizardError::NotPdf)
        } else if file.size() > MAX_PDF_BYTES {
            Some(WizardError::FileTooLarge { size: file.size() })
        } else {
            None
        };
        if let Some(err) = rejection {
            self.pdf.file = None;
            return Err(err);
        }

        if is_blank(&self.pdf.title) {
            self.pdf.title = file.stem().to_string();
        }
        self.pdf.file = Some(file);
        Ok(())
    }

    pub fn clear_pdf(&mut self) -> Result<(), WizardError> {
        self.expect_pdf_details()?;
        self.pdf.file = None;
        Ok(())
    }

    pub fn set_pdf_title(&mut self, title: &str) -> Result<(), WizardError> {
        self.expect_pdf_details()?;
        self.pdf.title = title.to_string();
        Ok(())
    }

    pub fn set_pdf_author(&mut self, author: &str) -> Result<(), WizardError> {
        self.expect_pdf_details()?;
        self.pdf.author = author.to_string();
        Ok(())
    }

    pub fn set_pdf_description(&mut self, description: &str) -> Result<(), WizardError> {
        self.expect_pdf_details()?;
        self.pdf.description = description.to_string();
        Ok(())
    }

    /// Read-only review of everything collected so far.
    pub fn review(&self) -> Result<DonationSubmission, WizardError> {
        self.validate_type_details()?;
        self.validate_contact()?;

        let contact = &self.contact;
        let details = match self.donation_type {
            Some(DonationType::Book) => DonationDetails::Book {
                books: self
                    .books
                    .iter()
                    .map(|b| DonatedBook {
                        title: b.title.trim().to_string(),
                        author: b.author.trim().to_string(),
                        genre: b.genre.trim().to_string(),
                        quantity: b.quantity.max(1),
                    })
                    .collect(),
                pickup: PickupAddress {
                    phone: contact.phone.trim().to_string(),
                    street_address: contact.street_address.trim().to_string(),
                    city: contact.city.trim().to_string(),
                    state: contact.state.trim().to_string(),
                    pincode: contact.pincode.trim().to_string(),
                },
            },
            Some(DonationType::Pdf) => {
                let file = self.pdf.file.clone().ok_or(WizardError::FileMissing)?;
                let description = self.pdf.description.trim();
                DonationDetails::Pdf {
                    title: self.pdf.title.trim().to_string(),
                    author: self.pdf.author.trim().to_string(),
                    description: (!description.is_empty()).then(|| description.to_string()),
                    file,
                }
            }
            None => return Err(WizardError::TypeNotSelected),
        };

        Ok(DonationSubmission {
            donor_name: contact.donor_name.trim().to_string(),
            donor_email: contact.donor_email.trim().to_string(),
            details,
        })
    }

    /// Explicit confirmation: enters `Submitting` and hands back the payload.
    pub fn confirm(&mut self) -> Result<DonationSubmission, WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        let submission = self.review()?;
        self.step = WizardStep::Submitting;
        Ok(submission)
    }

    /// Confirm and run the submission pipeline, ending in `Success` or `Failed`.
    pub async fn submit(
        &mut self,
        service: &DonationService,
    ) -> Result<DonationReceipt, WizardError> {
        let submission = self.confirm()?;
        match service.submit(submission).await {
            Ok(receipt) => {
                self.step = WizardStep::Success {
                    donation_id: receipt.donation_id.clone(),
                };
                Ok(receipt)
            }
            Err(e) => {
                self.step = WizardStep::Failed {
                    error: e.to_string(),
                };
                Err(WizardError::Submission(e))
            }
        }
    }

    /// After a failure, return to the review step with all data kept.
    pub fn retry(&mut self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::Failed { .. } => {
                self.step = WizardStep::Confirm;
                Ok(())
            }
            _ => Err(WizardError::WrongStep(self.step.name())),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep(self.step.name()))
        }
    }

    fn expect_book_details(&self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::TypeDetails)?;
        match self.donation_type {
            Some(DonationType::Book) => Ok(()),
            _ => Err(WizardError::WrongType("book")),
        }
    }

    fn expect_pdf_details(&self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::TypeDetails)?;
        match self.donation_type {
            Some(DonationType::Pdf) => Ok(()),
            _ => Err(WizardError::WrongType("pdf")),
        }
    }

    fn validate_type_details(&self) -> Result<(), WizardError> {
        match self.donation_type {
            None => Err(WizardError::TypeNotSelected),
            Some(DonationType::Book) => {
                for (i, entry) in self.books.iter().enumerate() {
                    let index = i + 1;
                    if is_blank(&entry.title) {
                        return Err(WizardError::BookEntry {
                            index,
                            field: "title",
                        });
                    }
                    if is_blank(&entry.author) {
                        return Err(WizardError::BookEntry {
                            index,
                            field: "author",
                        });
                    }
                }
                Ok(())
            }
            Some(DonationType::Pdf) => {
                if self.pdf.file.is_none() {
                    return Err(WizardError::FileMissing);
                }
                if is_blank(&self.pdf.title) {
                    return Err(WizardError::Required("title"));
                }
                if is_blank(&self.pdf.author) {
                    return Err(WizardError::Required("author"));
                }
                Ok(())
            }
        }
    }

    fn validate_contact(&self) -> Result<(), WizardError> {
        let c = &self.contact;
        if is_blank(&c.donor_name) {
            return Err(WizardError::Required("name"));
        }
        if is_blank(&c.donor_email) {
            return Err(WizardError::Required("email"));
        }
        if !is_valid_email(&c.donor_email) {
            return Err(WizardError::Invalid("email"));
        }

        if self.donation_type == Some(DonationType::Book) {
            let required = [
                ("phone", &c.phone),
                ("address", &c.street_address),
                ("city", &c.city),
                ("state", &c.state),
                ("pincode", &c.pincode),
            ];
            for (field, value) in required {
                if is_blank(value) {
                    return Err(WizardError::Required(field));
                }
            }
            if !is_valid_phone(&c.phone) {
                return Err(WizardError::Invalid("phone"));
            }
            if !is_valid_pincode(&c.pincode) {
                return Err(WizardError::Invalid("pincode"));
            }
        }
        Ok(())
    }
}
