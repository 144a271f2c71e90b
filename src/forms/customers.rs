use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;

use crate::domain::customer::NewCustomer;
use crate::domain::types::{CityName, EmailAddress, PersonName, PhoneNumber, SanitizedText};
use crate::forms::{FormError, optional_text};

#[derive(MultipartForm)]
pub struct UploadCustomersForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadCustomersForm {
    /// Reads the uploaded file and parses it as a customer list.
    pub fn parse(&self, import_batch: &str) -> Result<ParsedCustomers, FormError> {
        let content =
            std::fs::read(self.csv.file.path()).map_err(|e| FormError::Csv(e.to_string()))?;
        parse_customers_csv(&content, import_batch)
    }
}

/// Rows accepted from a CSV file plus the number of rows without a first name.
#[derive(Debug, Default)]
pub struct ParsedCustomers {
    pub customers: Vec<NewCustomer>,
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct ColumnMap {
    first_name: Option<usize>,
    last_name: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
    city: Option<usize>,
    note: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut map = ColumnMap::default();
        for (index, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_lowercase().as_str() {
                "ime" | "first_name" => &mut map.first_name,
                "prezime" | "last_name" => &mut map.last_name,
                "email" | "e-mail" => &mut map.email,
                "telefon" | "phone" | "mobitel" => &mut map.phone,
                "grad" | "city" => &mut map.city,
                "napomena" | "note" => &mut map.note,
                _ => continue,
            };
            slot.get_or_insert(index);
        }
        map
    }
}

/// Comma or semicolon, whichever appears more often in the header line.
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas { b';' } else { b',' }
}

/// Parses an uploaded customer list.
///
/// The header row is required and must contain a first name column. Emails
/// and phone numbers that fail validation are dropped, not the row.
pub fn parse_customers_csv(content: &[u8], import_batch: &str) -> Result<ParsedCustomers, FormError> {
    let content = String::from_utf8_lossy(content);
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FormError::Csv(e.to_string()))?
        .clone();
    let columns = ColumnMap::from_headers(&headers);
    let Some(first_name_column) = columns.first_name else {
        return Err(FormError::Csv("nedostaje stupac \"ime\"".to_string()));
    };

    let mut parsed = ParsedCustomers::default();
    for record in reader.records() {
        let record = record.map_err(|e| FormError::Csv(e.to_string()))?;
        let field = |column: Option<usize>| {
            column
                .and_then(|index| record.get(index))
                .and_then(optional_text)
        };

        let Some(first_name) = field(Some(first_name_column))
            .and_then(|name| PersonName::new(name).ok())
        else {
            parsed.skipped += 1;
            continue;
        };

        parsed.customers.push(NewCustomer {
            first_name,
            last_name: field(columns.last_name).unwrap_or_default().to_string(),
            email: field(columns.email).and_then(|e| EmailAddress::new(e).ok()),
            phone: field(columns.phone).and_then(|p| PhoneNumber::new(p).ok()),
            city: field(columns.city).and_then(|c| CityName::new(c).ok()),
            note: field(columns.note).and_then(SanitizedText::non_empty),
            import_batch: import_batch.to_string(),
        });
    }

    Ok(parsed)
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
}
