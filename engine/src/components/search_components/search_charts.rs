//! Headless charts: what each chart asks the search API to aggregate.

use serde_json::json;

use crate::collaborators::{ChartCollaborator, ChartSearchParam};

/// Values distribution of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionChart {
    pub search_name: String,
    pub field: String,
}

impl DistributionChart {
    pub fn new(search_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self { search_name: search_name.into(), field: field.into() }
    }
}

impl ChartCollaborator for DistributionChart {
    fn search_param(&self, is_get_request: bool) -> ChartSearchParam {
        if is_get_request {
            ChartSearchParam::Token(self.field.clone())
        } else {
            ChartSearchParam::Spec(json!({
                "chart_type": "DistributionChartType",
                "field": self.field,
            }))
        }
    }
}


/// One field against another.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub search_name: String,
    pub x: String,
    pub y: String,
}

impl ScatterChart {
    pub fn new(search_name: impl Into<String>, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self { search_name: search_name.into(), x: x.into(), y: y.into() }
    }
}

impl ChartCollaborator for ScatterChart {
    fn search_param(&self, is_get_request: bool) -> ChartSearchParam {
        if is_get_request {
            ChartSearchParam::Token(format!("{}:{}", self.x, self.y))
        } else {
            ChartSearchParam::Spec(json!({
                "chart_type": "ScatterChartType",
                "x": self.x,
                "y": self.y,
            }))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_params() {
        let distribution = DistributionChart::new("products", "nutriscore_grade");
        assert_eq!(distribution.search_param(true), ChartSearchParam::Token("nutriscore_grade".to_string()));
        assert_eq!(
            distribution.search_param(false),
            ChartSearchParam::Spec(json!({"chart_type": "DistributionChartType", "field": "nutriscore_grade"}))
        );

        let scatter = ScatterChart::new("products", "energy", "sugars");
        assert_eq!(scatter.search_param(true).into_token(), "energy:sugars");
        assert_eq!(
            scatter.search_param(false).into_json(),
            json!({"chart_type": "ScatterChartType", "x": "energy", "y": "sugars"})
        );
    }
}
