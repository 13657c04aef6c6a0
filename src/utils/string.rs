/// Leading context every full name carries; redundant in a display name.
pub const ROOT_PREFIX: &str = "nspec. ";

pub const CONTEXT_SEPARATOR: &str = ". ";
pub const DISPLAY_SEPARATOR: &str = " › ";

/// Turns a fully qualified example name into a display name.
///
/// Strips the leading `nspec. ` once and replaces every context separator
/// with ` › `. Total over all inputs; names without separators pass through
/// unchanged. The result never contains a context separator, so applying it
/// twice changes nothing.
pub fn beautify_for_display(full_name: &str) -> String {
    let trimmed = full_name.strip_prefix(ROOT_PREFIX).unwrap_or(full_name);
    let mut display = trimmed.replace(CONTEXT_SEPARATOR, DISPLAY_SEPARATOR);
    // "a.. b" leaves "a. › b" behind after one pass
    while display.contains(CONTEXT_SEPARATOR) {
        display = display.replace(CONTEXT_SEPARATOR, DISPLAY_SEPARATOR);
    }
    display
}

pub fn extract_last_segment(path: &str) -> String {
    path.rsplit(['/', '.', ':'])
        .next()
        .unwrap_or(path)
        .to_string()
}

/// Short type name with generic noise removed: `a::b::Foo<T>` and
/// ``a.b.Foo`1`` both become `Foo`.
pub fn clean_type_name(full_name: &str) -> String {
    let without_generics = full_name.split('<').next().unwrap_or(full_name);
    let last = extract_last_segment(without_generics);
    last.split('`').next().unwrap_or(&last).to_string()
}

/// Member name as shown in a context or example name.
pub fn humanize(member_name: &str) -> String {
    member_name.replace('_', " ").trim().to_string()
}
