use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::crawler::models::{PropertyRecord, PropertyType};

/// Keys retained from the embedded `av_items` blob; everything else is noise.
const RECOGNIZED_KEYS: &[&str] = &[
    "id",
    "zip_code",
    "subtype",
    "price",
    "nb_bedrooms",
    "kitchen_type",
    "land_surface",
    "building_state",
    "province",
    "year_of_construction",
    "geolocation",
];

/// Collects listing URLs from one search-results page, in document order.
/// Duplicates within a page are kept; a malformed page yields an empty list.
pub fn extract_listing_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a.card__title-link[href*=\"classified\"]").unwrap();

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Returns the `/`-delimited path segment at `offset` positions from the
/// end of the URL (1 = last segment).
fn segment_from_end(url: &str, offset: usize) -> Option<&str> {
    let segments: Vec<&str> = url.trim().split('/').collect();
    segments.len().checked_sub(offset).map(|i| segments[i])
}

/// True for "real estate project" container listings, which bundle many
/// units under one URL and are never emitted as records. The category token
/// sits five segments from the end of the listing URL.
pub fn is_project_listing(url: &str) -> bool {
    segment_from_end(url, 5)
        .map(|segment| segment.replace('-', " ").contains("real estate project"))
        .unwrap_or(false)
}

/// Extracts the `av_items` blob from a listing page.
///
/// The blob is a JavaScript array-of-objects literal with unquoted keys and
/// trailing commas, so no structured parser will touch it. Instead it is
/// tokenized line by line: strip quoting and trailing commas, skip the
/// bracket lines, split each remaining line on its first colon, and keep
/// only recognized keys (last write wins). Any failure to locate the blob
/// yields an empty map and the caller falls back to table data.
pub fn parse_embedded_data(html: &str) -> HashMap<String, String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").unwrap();
    let pattern = Regex::new(r"(?s)av_items\s*=\s*(\[\{.*?\}\])").unwrap();

    for script in document.select(&selector) {
        let text: String = script.text().collect();
        if let Some(caps) = pattern.captures(&text) {
            return parse_av_items(caps.get(1).map_or("", |m| m.as_str()));
        }
    }

    HashMap::new()
}

fn parse_av_items(body: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for raw_line in body.lines() {
        let line = raw_line.trim().replace('"', "");
        let line = line.trim_end_matches(',').trim();
        if line.is_empty() || matches!(line, "[{" | "}]" | "{" | "}") {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if RECOGNIZED_KEYS.contains(&key) {
            fields.insert(key.to_string(), value.trim().to_string());
        }
    }

    fields
}

fn first_text(el: ElementRef<'_>) -> Option<String> {
    el.text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Extracts the visible details table as label -> first value-cell text.
///
/// Header and data cells are paired by index. A cell with no usable text
/// maps to a sentinel ("NA" for labels, "Not found" for values) instead of
/// being dropped, so pairing stays positional.
pub fn parse_details_table(html: &str) -> HashMap<String, String> {
    let document = Html::parse_document(html);
    let th_selector = Selector::parse("th.classified-table__header").unwrap();
    let td_selector = Selector::parse("td.classified-table__data").unwrap();

    let labels: Vec<String> = document
        .select(&th_selector)
        .map(|th| first_text(th).unwrap_or_else(|| "NA".to_string()))
        .collect();
    let values: Vec<String> = document
        .select(&td_selector)
        .map(|td| first_text(td).unwrap_or_else(|| "Not found".to_string()))
        .collect();

    labels.into_iter().zip(values).collect()
}

/// Merges the embedded blob, the details table and URL-derived metadata
/// into one complete record. Total: both maps may be empty and every
/// schema field still comes out populated.
pub fn build_record(
    url: &str,
    embedded: &HashMap<String, String>,
    table: &HashMap<String, String>,
) -> PropertyRecord {
    let mut record = PropertyRecord::default();

    record.id = embedded.get("id").cloned();
    record.subtype = embedded.get("subtype").cloned();
    record.kitchen_type = embedded.get("kitchen_type").cloned();
    record.building_state = embedded.get("building_state").cloned();
    record.geolocation = embedded.get("geolocation").cloned();
    record.province = embedded.get("province").cloned();
    if let Some(price) = embedded.get("price") {
        record.price = price.clone();
    }
    if let Some(bedrooms) = embedded.get("nb_bedrooms") {
        record.nb_bedrooms = bedrooms.clone();
    }
    if let Some(surface) = embedded.get("land_surface") {
        record.land_surface = surface.clone();
    }
    if let Some(zip) = embedded.get("zip_code") {
        record.zip_code = zip.clone();
    }
    if let Some(year) = embedded.get("year_of_construction") {
        record.year_of_construction = year.clone();
    }

    record.city = segment_from_end(url, 3).map(|s| s.replace('-', " "));
    record.p_type = PropertyType::classify(record.subtype.as_deref());

    if let Some(area) = table.get("Living area") {
        record.living_area = area.clone();
    }
    record.furnished = if table.get("Furnished").map(String::as_str) == Some("Yes") {
        "1".to_string()
    } else {
        "0".to_string()
    };
    // Presence-only test: the fireplace count's value is ignored.
    record.open_fire = if table.contains_key("How many fireplaces?") {
        "1".to_string()
    } else {
        "0".to_string()
    };

    // A surface without its boolean flag (or vice versa) counts as absent.
    if table.contains_key("Terrace") {
        if let Some(surface) = table.get("Terrace surface") {
            record.terrace = surface.clone();
        }
    }
    if table.contains_key("Garden") {
        if let Some(surface) = table.get("Garden surface") {
            record.garden = surface.clone();
        }
    }

    match table.get("Surface of the plot") {
        Some(plot) if plot != "''" => record.plot_surface = plot.clone(),
        _ => {}
    }
    if let Some(facades) = table.get("Number of frontages") {
        record.facades = facades.clone();
    }
    match table.get("Swimming pool") {
        Some(pool) if pool != "No" => record.swim_pool = pool.clone(),
        _ => {}
    }

    record.zero_fill();
    record
}
