//! Naming helpers for deriving generated identifiers from schema names.

/// Convert a string to PascalCase (e.g., "order_items" -> "OrderItems")
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to snake_case (e.g., "OrderItems" -> "order_items")
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_lowercase().next().unwrap());
    }
    result.replace('-', "_")
}

/// Pluralize an English identifier.
///
/// Best-effort rules, good enough for the table names that show up in
/// relational schemas: "order" -> "orders", "address" -> "addresses",
/// "category" -> "categories". Already-plural inputs should go through
/// [`singularize`] first if a canonical plural is needed.
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let lower = s.to_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        format!("{}es", s)
    } else if let Some(stem) = s.strip_suffix('y') {
        let before = stem.chars().last();
        match before {
            Some(c) if !is_vowel(c) => format!("{}ies", stem),
            _ => format!("{}s", s),
        }
    } else {
        format!("{}s", s)
    }
}

/// Singularize an English identifier.
///
/// Inverse of [`pluralize`] for the same rule set: "orders" -> "order",
/// "addresses" -> "address", "categories" -> "category". Words that do
/// not look plural are returned unchanged.
pub fn singularize(s: &str) -> String {
    let lower = s.to_lowercase();
    if let Some(stem) = s.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{}y", stem);
        }
    }
    for suffix in ["sses", "xes", "zes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return s[..s.len() - 2].to_string();
        }
    }
    if lower.ends_with('s') && !lower.ends_with("ss") && s.len() > 1 {
        return s[..s.len() - 1].to_string();
    }
    s.to_string()
}

/// Strip one trailing `ID`/`Id`/`id` suffix from an identifier.
///
/// Foreign-key columns are conventionally named `customer_id` or
/// `customerId`; the relation they generate should read `customer`.
/// A lone `id` (nothing left after stripping) is returned unchanged.
pub fn strip_id_suffix(s: &str) -> String {
    for suffix in ["_ID", "_Id", "_id", "ID", "Id", "id"] {
        if let Some(stem) = s.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    s.to_string()
}

/// Default object (table-definition) identifier for a table name.
pub fn to_object_name(table: &str) -> String {
    pluralize(&singularize(table))
}

/// Default class (entity) identifier for a table name.
pub fn to_class_name(table: &str) -> String {
    singularize(table)
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("order"), "orders");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize(""), "");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("orders"), "order");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("order"), "order");
        assert_eq!(singularize("address"), "address");
    }

    #[test]
    fn test_object_name_is_stable_for_plural_input() {
        // "orders" is already plural; the canonical object name must not
        // grow another suffix.
        assert_eq!(to_object_name("orders"), "orders");
        assert_eq!(to_object_name("order"), "orders");
    }

    #[test]
    fn test_class_name() {
        assert_eq!(to_class_name("customers"), "customer");
        assert_eq!(to_class_name("customer"), "customer");
    }

    #[test]
    fn test_strip_id_suffix() {
        assert_eq!(strip_id_suffix("customer_id"), "customer");
        assert_eq!(strip_id_suffix("customerId"), "customer");
        assert_eq!(strip_id_suffix("customerID"), "customer");
        assert_eq!(strip_id_suffix("customer"), "customer");
        // a bare key column keeps its name rather than collapsing to ""
        assert_eq!(strip_id_suffix("id"), "id");
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_pascal_case("order_items"), "OrderItems");
        assert_eq!(to_snake_case("OrderItems"), "order_items");
    }
}
