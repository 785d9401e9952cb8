//! The per-request template context ("locals").

use serde::Serialize;
use serde_json::{Map, Value};

/// What every view gets to see. `data` is the merged session bag;
/// `query` is the raw query mapping, available even for keys the
/// session layer refuses to capture.
#[derive(Debug, Clone, Serialize)]
pub struct ViewLocals {
    #[serde(rename = "serviceName")]
    pub service_name: String,
    pub query: Map<String, Value>,
    pub data: Map<String, Value>,
}

impl ViewLocals {
    pub fn new(
        service_name: impl Into<String>,
        query: Map<String, Value>,
        data: Map<String, Value>,
    ) -> Self {
        ViewLocals {
            service_name: service_name.into(),
            query,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn t_template_visible_names() {
        let locals = ViewLocals::new("Apply for a juggling licence",
                                     Map::new(), Map::new());
        let v = serde_json::to_value(&locals).unwrap();
        assert_eq!(v, json!({
            "serviceName": "Apply for a juggling licence",
            "query": {},
            "data": {},
        }));
    }
}
