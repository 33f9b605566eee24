//! Route labels for spans and metrics.

use uuid::Uuid;

/// Replace uuid path segments with `{uuid}` so labels stay low-cardinality.
pub(super) fn route_label(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_replaced() {
        let line = Uuid::now_v7();

        assert_eq!(route_label(&format!("/cart/items/{line}")), "/cart/items/{uuid}");
    }

    #[test]
    fn static_paths_are_unchanged() {
        assert_eq!(route_label("/"), "/");
        assert_eq!(route_label("/cart"), "/cart");
        assert_eq!(route_label("/healthcheck"), "/healthcheck");
    }
}
