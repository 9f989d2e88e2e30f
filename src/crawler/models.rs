use serde::Serialize;

/// Broad property class derived from the listing subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Other,
}

const HOUSE_SUBTYPES: &[&str] = &[
    "house",
    "villa",
    "mansion",
    "town-house",
    "mixed-use-building",
    "exceptional-property",
];

const APARTMENT_SUBTYPES: &[&str] = &[
    "apartment",
    "ground-floor",
    "penthouse",
    "flat-studio",
    "apartment-block",
    "duplex",
    "ground_floor",
];

impl PropertyType {
    /// Classifies a raw subtype token against the fixed category lists.
    /// Unknown or missing subtypes are `Other`.
    pub fn classify(subtype: Option<&str>) -> Self {
        match subtype {
            Some(s) if HOUSE_SUBTYPES.contains(&s) => Self::House,
            Some(s) if APARTMENT_SUBTYPES.contains(&s) => Self::Apartment,
            _ => Self::Other,
        }
    }
}

/// One normalized listing. Field order is the output column order.
///
/// "Numeric or 0" fields keep the page's raw text and default to "0",
/// so an absent value and a defaulted value are the same observable state.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyRecord {
    pub id: Option<String>,
    pub city: Option<String>,
    pub p_type: PropertyType,
    pub subtype: Option<String>,
    pub price: String,
    pub nb_bedrooms: String,
    pub living_area: String,
    pub kitchen_type: Option<String>,
    pub furnished: String,
    pub open_fire: String,
    pub terrace: String,
    pub garden: String,
    pub land_surface: String,
    pub plot_surface: String,
    pub building_state: Option<String>,
    pub facades: String,
    pub swim_pool: String,
    pub zip_code: String,
    pub year_of_construction: String,
    pub geolocation: Option<String>,
    pub province: Option<String>,
}

impl Default for PropertyRecord {
    fn default() -> Self {
        Self {
            id: None,
            city: None,
            p_type: PropertyType::Other,
            subtype: None,
            price: "0".to_string(),
            nb_bedrooms: "0".to_string(),
            living_area: "0".to_string(),
            kitchen_type: None,
            furnished: "0".to_string(),
            open_fire: "0".to_string(),
            terrace: "0".to_string(),
            garden: "0".to_string(),
            land_surface: "0".to_string(),
            plot_surface: "0".to_string(),
            building_state: None,
            facades: "0".to_string(),
            swim_pool: "0".to_string(),
            zip_code: "0".to_string(),
            year_of_construction: "0".to_string(),
            geolocation: None,
            province: None,
        }
    }
}

impl PropertyRecord {
    /// Rewrites every empty-string value to "0", including inside `Some`.
    pub fn zero_fill(&mut self) {
        for field in [
            &mut self.price,
            &mut self.nb_bedrooms,
            &mut self.living_area,
            &mut self.furnished,
            &mut self.open_fire,
            &mut self.terrace,
            &mut self.garden,
            &mut self.land_surface,
            &mut self.plot_surface,
            &mut self.facades,
            &mut self.swim_pool,
            &mut self.zip_code,
            &mut self.year_of_construction,
        ] {
            if field.is_empty() {
                *field = "0".to_string();
            }
        }

        for field in [
            &mut self.id,
            &mut self.city,
            &mut self.subtype,
            &mut self.kitchen_type,
            &mut self.building_state,
            &mut self.geolocation,
            &mut self.province,
        ] {
            if matches!(field.as_deref(), Some("")) {
                *field = Some("0".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_house_subtypes() {
        assert_eq!(PropertyType::classify(Some("villa")), PropertyType::House);
        assert_eq!(
            PropertyType::classify(Some("exceptional-property")),
            PropertyType::House
        );
    }

    #[test]
    fn classify_apartment_subtypes() {
        assert_eq!(
            PropertyType::classify(Some("duplex")),
            PropertyType::Apartment
        );
        assert_eq!(
            PropertyType::classify(Some("ground_floor")),
            PropertyType::Apartment
        );
    }

    #[test]
    fn classify_is_pure_and_defaults_to_other() {
        assert_eq!(PropertyType::classify(Some("castle")), PropertyType::Other);
        assert_eq!(PropertyType::classify(Some("castle")), PropertyType::Other);
        assert_eq!(PropertyType::classify(None), PropertyType::Other);
    }

    #[test]
    fn zero_fill_rewrites_empty_strings() {
        let mut record = PropertyRecord {
            price: String::new(),
            id: Some(String::new()),
            ..Default::default()
        };
        record.zero_fill();
        assert_eq!(record.price, "0");
        assert_eq!(record.id.as_deref(), Some("0"));
        assert_eq!(record.nb_bedrooms, "0");
    }
}
