//! Route labels for spans and metrics.

use uuid::Uuid;

/// Replace UUID path segments with `{uuid}` to keep label cardinality bounded.
pub(super) fn normalise_path(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_uuid_segments() {
        let product = Uuid::now_v7();

        assert_eq!(
            normalise_path(&format!("/cart/items/{product}")),
            "/cart/items/{uuid}"
        );
    }

    #[test]
    fn keeps_static_paths() {
        assert_eq!(normalise_path("/"), "/");
        assert_eq!(normalise_path("/cart"), "/cart");
        assert_eq!(normalise_path("/cart/items/not-a-uuid"), "/cart/items/not-a-uuid");
    }
}
