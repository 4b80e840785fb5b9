use crate::types::StructuredAddress;

/// Compose a short address from Nominatim components.
///
/// Takes the first non-empty value of each group, in order: building or
/// house number, road or neighbourhood, suburb, city/town/village,
/// postcode, state, country. Returns `display_name` when every group is
/// empty.
pub fn format_address(addr: &StructuredAddress, display_name: &str) -> String {
    let groups: [&[&Option<String>]; 7] = [
        &[&addr.building, &addr.house_number],
        &[&addr.road, &addr.neighbourhood],
        &[&addr.suburb],
        &[&addr.city, &addr.town, &addr.village],
        &[&addr.postcode],
        &[&addr.state],
        &[&addr.country],
    ];

    let parts: Vec<&str> = groups
        .iter()
        .filter_map(|group| {
            group
                .iter()
                .filter_map(|opt| opt.as_deref())
                .find(|value| !value.is_empty())
        })
        .collect();

    if parts.is_empty() {
        display_name.to_string()
    } else {
        parts.join(", ")
    }
}
