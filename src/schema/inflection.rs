//! Naming conventions for the generated schema
//!
//! Simplified inflection: table names become singular PascalCase type names,
//! fields are camelCase, collection fields are pluralized. Matches the
//! "simplified" naming most clients expect (itemById-free, no table prefixes).

/// `order_item` -> `OrderItem`
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::new();
    let mut upper_next = true;
    for ch in s.chars() {
        if ch == '_' || ch == '-' {
            upper_next = true;
        } else if upper_next {
            result.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// `order_item` -> `orderItem`
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `orderItem` -> `ORDER_ITEM`, used for enum value names
pub fn to_upper_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            result.push('_');
        }
        if ch == '_' || ch == '-' {
            result.push('_');
        } else {
            result.push(ch.to_ascii_uppercase());
        }
    }
    result
}

/// Strip a plural suffix: `items` -> `item`, `boxes` -> `box`, `parties` -> `party`
pub fn singularize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    for suffix in ["ses", "xes", "zes", "ches", "shes"] {
        if let Some(stem) = s.strip_suffix(suffix) {
            if !stem.is_empty() {
                return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
            }
        }
    }
    if let Some(stem) = s.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') {
            return stem.to_string();
        }
    }
    s.to_string()
}

/// `item` -> `items`, `box` -> `boxes`, `party` -> `parties`
pub fn pluralize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix('y') {
        let vowel_before = stem
            .chars()
            .last()
            .map(|c| "aeiou".contains(c))
            .unwrap_or(false);
        if !vowel_before {
            return format!("{}ies", stem);
        }
    }
    if s.ends_with('s') || s.ends_with('x') || s.ends_with('z') || s.ends_with("ch") || s.ends_with("sh")
    {
        return format!("{}es", s);
    }
    format!("{}s", s)
}

/// GraphQL type name for a table: `items` -> `Item`
pub fn type_name(table: &str) -> String {
    to_pascal_case(&singularize(table))
}

/// Single-row query field: `items` -> `item`
pub fn singular_field_name(table: &str) -> String {
    to_camel_case(&singularize(table))
}

/// Collection query field: `item` -> `items`
pub fn collection_field_name(table: &str) -> String {
    to_camel_case(&pluralize(&singularize(table)))
}
