use serde::Deserialize;
use validator::Validate;

use crate::domain::listing::ListingDetails;
use crate::domain::types::{Amount, CityName, ImageUrl, ListingTitle, SanitizedText};
use crate::forms::{FormError, optional_text, parse_optional};

#[derive(Deserialize, Validate)]
/// Create/edit form of a listing. Optional numeric inputs arrive as text.
pub struct ListingForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
    pub property_type: String,
    pub transaction_type: String,
    pub price: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub rooms: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub image_url: String,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub is_published: Option<String>,
}

impl ListingForm {
    pub fn publish_requested(&self) -> bool {
        self.is_published.is_some()
    }
}

impl TryFrom<&ListingForm> for ListingDetails {
    type Error = FormError;

    fn try_from(form: &ListingForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let price = optional_text(&form.price)
            .ok_or(FormError::Required("cijena"))?
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| FormError::InvalidAmount)?;
        let area = parse_optional::<f64>(&form.area.replace(',', "."), "površina")?
            .map(Amount::new)
            .transpose()
            .map_err(FormError::for_field("površina"))?;
        let rooms = parse_optional::<i32>(&form.rooms, "sobe")?;
        if rooms.is_some_and(|r| r < 0) {
            return Err(FormError::InvalidField("sobe"));
        }

        Ok(ListingDetails {
            title: ListingTitle::new(form.title.as_str()).map_err(FormError::for_field("naslov"))?,
            description: SanitizedText::new(form.description.as_str()),
            property_type: form
                .property_type
                .parse()
                .map_err(FormError::for_field("vrsta nekretnine"))?,
            transaction_type: form
                .transaction_type
                .parse()
                .map_err(FormError::for_field("vrsta transakcije"))?,
            price: Amount::new(price).map_err(FormError::for_field("cijena"))?,
            area,
            rooms,
            city: CityName::new(form.city.as_str()).map_err(FormError::for_field("grad"))?,
            address: optional_text(&form.address).map(str::to_string),
            image_url: optional_text(&form.image_url)
                .map(ImageUrl::new)
                .transpose()
                .map_err(FormError::for_field("slika"))?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
/// Query string of the listings table.
pub struct ListingsQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    /// `1`/`true` shows the archive instead of active listings.
    pub archived: Option<String>,
}

impl ListingsQuery {
    pub fn show_archived(&self) -> bool {
        matches!(self.archived.as_deref(), Some("1" | "true" | "on"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{PropertyType, TransactionType};

    fn form() -> ListingForm {
        ListingForm {
            title: "Stan na Trešnjevci".to_string(),
            description: "<b>Svijetao</b> stan<script>alert(1)</script>".to_string(),
            property_type: "stan".to_string(),
            transaction_type: "prodaja".to_string(),
            price: "185000,50".to_string(),
            area: "62.5".to_string(),
            rooms: "".to_string(),
            city: "Zagreb".to_string(),
            address: "  ".to_string(),
            image_url: String::new(),
            is_published: Some("on".to_string()),
        }
    }

    #[test]
    fn converts_submitted_fields() {
        let form = form();
        let details = ListingDetails::try_from(&form).unwrap();
        assert_eq!(details.title.as_str(), "Stan na Trešnjevci");
        assert_eq!(details.property_type, PropertyType::Apartment);
        assert_eq!(details.transaction_type, TransactionType::Sale);
        assert_eq!(details.price.get(), 185000.5);
        assert_eq!(details.area.map(Amount::get), Some(62.5));
        assert_eq!(details.rooms, None);
        assert_eq!(details.address, None);
        assert!(!details.description.as_str().contains("script"));
        assert!(form.publish_requested());
    }

    #[test]
    fn rejects_missing_price_and_unknown_type() {
        let mut missing_price = form();
        missing_price.price = " ".to_string();
        assert!(matches!(
            ListingDetails::try_from(&missing_price),
            Err(FormError::Required("cijena"))
        ));

        let mut bad_type = form();
        bad_type.property_type = "dvorac".to_string();
        assert!(matches!(
            ListingDetails::try_from(&bad_type),
            Err(FormError::InvalidField("vrsta nekretnine"))
        ));
    }

    #[test]
    fn negative_price_is_invalid() {
        let mut negative = form();
        negative.price = "-10".to_string();
        assert!(matches!(
            ListingDetails::try_from(&negative),
            Err(FormError::InvalidAmount)
        ));
    }
}
