//! `POST /api/donations` - multipart donation form
//!
//! The form is replayed through [`DonationWizard`] so the server applies
//! the same step gates as the client before the pipeline runs.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::{DonationType, PdfFile};
use crate::infrastructure::AppState;
use crate::services::{DonationWizard, WizardError};

/// Raw multipart fields
#[derive(Debug, Default)]
pub struct DonationForm {
    pub donation_type: String,
    pub donor_name: String,
    pub donor_email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    /// JSON array of `{title, author, genre, quantity}`
    pub books: Option<String>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub file: Option<PdfFile>,
}

#[derive(Debug, Deserialize)]
struct BookEntryForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    quantity: Option<Value>,
}

impl BookEntryForm {
    fn raw_quantity(&self) -> String {
        match &self.quantity {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }
}

async fn read_form(multipart: &mut Multipart) -> Result<DonationForm, String> {
    let mut form = DonationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("donation.pdf").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| e.to_string())?;
            form.file = Some(PdfFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(|e| e.to_string())?;
        match name.as_str() {
            "donationType" => form.donation_type = value,
            "donorName" | "name" => form.donor_name = value,
            "donorEmail" | "email" => form.donor_email = value,
            "phone" => form.phone = value,
            "address" => form.address = value,
            "city" => form.city = value,
            "state" => form.state = value,
            "pincode" => form.pincode = value,
            "books" => form.books = Some(value),
            "title" => form.title = value,
            "author" => form.author = value,
            "description" => form.description = value,
            other => tracing::debug!("Ignoring donation form field '{}'", other),
        }
    }
    Ok(form)
}

/// Walk the wizard from the first step to `Confirm` with the form's values.
pub fn wizard_from_form(form: DonationForm) -> Result<DonationWizard, WizardError> {
    let donation_type =
        DonationType::parse(&form.donation_type).ok_or(WizardError::TypeNotSelected)?;

    let mut wizard = DonationWizard::new();
    wizard.choose_type(donation_type)?;
    wizard.next()?;

    match donation_type {
        DonationType::Book => {
            let entries: Vec<BookEntryForm> = match form.books.as_deref() {
                Some(raw) if !raw.trim().is_empty() => {
                    serde_json::from_str(raw).map_err(|_| WizardError::Invalid("books"))?
                }
                _ => Vec::new(),
            };
            if entries.is_empty() {
                return Err(WizardError::LastBookEntry);
            }
            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    wizard.add_book_entry()?;
                }
                wizard.edit_book_entry(i, |draft| {
                    draft.title = entry.title.clone();
                    draft.author = entry.author.clone();
                    draft.genre = entry.genre.clone();
                })?;
                wizard.set_book_quantity(i, &entry.raw_quantity())?;
            }
        }
        DonationType::Pdf => {
            wizard.set_pdf_title(&form.title)?;
            wizard.set_pdf_author(&form.author)?;
            wizard.set_pdf_description(&form.description)?;
            let file = form.file.ok_or(WizardError::FileMissing)?;
            wizard.select_pdf(file)?;
        }
    }
    wizard.next()?;

    let contact = wizard.contact_mut()?;
    contact.donor_name = form.donor_name;
    contact.donor_email = form.donor_email;
    contact.phone = form.phone;
    contact.street_address = form.address;
    contact.city = form.city;
    contact.state = form.state;
    contact.pincode = form.pincode;
    wizard.next()?;

    Ok(wizard)
}

fn rejected(e: WizardError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": e.to_string() })),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/donations",
    request_body(content = String, content_type = "multipart/form-data", description = "Donation form fields and an optional PDF file"),
    responses(
        (status = 201, description = "Donation recorded"),
        (status = 400, description = "Form failed validation"),
        (status = 500, description = "Submission failed and was rolled back")
    )
)]
pub async fn create_donation(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Unreadable donation form: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": e })),
            )
                .into_response();
        }
    };

    let mut wizard = match wizard_from_form(form) {
        Ok(wizard) => wizard,
        Err(e) => return rejected(e),
    };

    match wizard.submit(&state.donations).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "donationId": receipt.donation_id,
                "status": receipt.status,
                "fileUrl": receipt.file_url,
            })),
        )
            .into_response(),
        Err(WizardError::Submission(e)) => {
            tracing::error!("Donation submission failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => rejected(e),
    }
}
