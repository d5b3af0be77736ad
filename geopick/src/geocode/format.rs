//! Address line formatting.

use super::StructuredAddress;

/// Builds a single address line from structured fields.
///
/// Field precedence: house number + road (or road alone), suburb, city,
/// town, village, county, state, postcode, country. Absent or blank fields
/// are skipped and the rest are joined with `", "`. A house number without
/// a road is dropped.
pub fn format_address(address: &StructuredAddress) -> String {
    let mut parts: Vec<String> = Vec::new();

    match (present(&address.house_number), present(&address.road)) {
        (Some(number), Some(road)) => parts.push(format!("{} {}", number, road)),
        (None, Some(road)) => parts.push(road.to_string()),
        _ => {}
    }

    let rest = [
        &address.suburb,
        &address.city,
        &address.town,
        &address.village,
        &address.county,
        &address.state,
        &address.postcode,
        &address.country,
    ];
    parts.extend(rest.into_iter().filter_map(present).map(str::to_string));

    parts.join(", ")
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
