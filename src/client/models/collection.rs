//! OData collection envelope

use serde::Deserialize;

/// One page of a Graph collection response
#[derive(Debug, Clone, Deserialize)]
pub struct GraphCollection<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Absolute URL of the next page, absent on the last page
    #[serde(default, rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}
