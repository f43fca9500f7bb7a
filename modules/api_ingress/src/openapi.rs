use std::collections::BTreeSet;

use parking_lot::Mutex;
use serde_json::Value;
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// The host's OpenAPI document, assembled from per-module fragments.
pub struct OpenApiDocument {
    doc: Mutex<OpenApi>,
}

impl OpenApiDocument {
    pub fn new(title: &str, version: &str) -> Self {
        let doc = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title(title)
                    .version(version)
                    .description(Some("Users with discriminated profile fields"))
                    .build(),
            )
            .build();
        Self {
            doc: Mutex::new(doc),
        }
    }

    /// Merge a fragment. Operations already present keep their first definition.
    pub fn merge(&self, fragment: OpenApi) {
        let incoming = operation_keys(&fragment);
        let mut doc = self.doc.lock();
        let existing = operation_keys(&doc);
        for dup in incoming.intersection(&existing) {
            tracing::error!(
                operation = %dup,
                "Duplicate (method, path) detected; keeping the first registration"
            );
        }
        doc.merge(fragment);
        tracing::debug!(
            total_operations = existing.union(&incoming).count(),
            "Merged OpenAPI fragment"
        );
    }

    pub fn snapshot(&self) -> OpenApi {
        self.doc.lock().clone()
    }

    pub fn operation_count(&self) -> usize {
        operation_keys(&self.doc.lock()).len()
    }
}

/// `"METHOD /path"` for every operation in `doc`.
fn operation_keys(doc: &OpenApi) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    let Ok(Value::Object(paths)) = serde_json::to_value(&doc.paths) else {
        return keys;
    };
    for (path, item) in paths {
        let Value::Object(item) = item else { continue };
        for method in HTTP_METHODS {
            if item.contains_key(method) {
                keys.insert(format!("{} {path}", method.to_uppercase()));
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::path::{HttpMethod, OperationBuilder, PathItem, PathsBuilder};

    fn fragment(path: &str, method: HttpMethod) -> OpenApi {
        OpenApiBuilder::new()
            .paths(
                PathsBuilder::new()
                    .path(path, PathItem::new(method, OperationBuilder::new().build())),
            )
            .build()
    }

    #[test]
    fn merges_operations_from_several_fragments() {
        let doc = OpenApiDocument::new("Test API", "0.1.0");
        assert_eq!(doc.operation_count(), 0);

        doc.merge(fragment("/api/users", HttpMethod::Get));
        doc.merge(fragment("/api/hello", HttpMethod::Get));

        assert_eq!(doc.operation_count(), 2);
        let json = serde_json::to_value(doc.snapshot()).unwrap();
        assert_eq!(json["info"]["title"], "Test API");
        assert!(json["paths"]["/api/users"]["get"].is_object());
        assert!(json["paths"]["/api/hello"]["get"].is_object());
    }
}
