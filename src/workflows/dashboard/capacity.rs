use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)$").unwrap());
static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(person|bed)").unwrap());

const NAMED_CAPACITIES: [(&str, u32); 7] = [
    ("single", 1),
    ("double", 2),
    ("triple", 3),
    ("four sharing", 4),
    ("five sharing", 5),
    ("six sharing", 6),
    ("dormitory", 10),
];

/// Beds in a room, read from its room type.
///
/// A purely numeric type name wins, then a known sharing keyword in the name, then
/// an `N person` / `N bed` phrase in the description. Unknown types count as zero.
pub fn bed_capacity(room_type_name: Option<&str>, description: Option<&str>) -> u32 {
    if let Some(name) = room_type_name.filter(|name| !name.is_empty()) {
        if let Some(capacity) = first_number(&NUMERIC_NAME_RE, name) {
            return capacity;
        }

        let lower = name.to_lowercase();
        if let Some((_, capacity)) = NAMED_CAPACITIES
            .iter()
            .find(|(pattern, _)| lower.contains(pattern))
        {
            return *capacity;
        }
    }

    description
        .and_then(|text| first_number(&DESCRIPTION_RE, text))
        .unwrap_or(0)
}

fn first_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
