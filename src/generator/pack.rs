use crate::packer::ParsedQuery;
use crate::utils::error::PackError;
use serde::Serialize;
use std::collections::HashSet;

/// Provenance recorded in every generated pack unless overridden.
pub const DEFAULT_AUTHOR: &str = "reprise99/Sentinel-Queries";

/// A query pack generated from one folder of query files.
///
/// Field order is the order keys appear in the written document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPack {
    /// Folder label the pack was built from
    pub name: String,
    /// Generated folder phrase, or the single query's own description
    pub description: String,
    /// Origin of the query corpus
    pub author: String,
    /// Either one query or a list of named queries
    #[serde(flatten)]
    pub content: PackContent,
}

/// Shape of a pack's queries. Serialized as a `query` or `queries` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackContent {
    /// A folder with exactly one query
    Query(String),
    /// A folder with two or more queries, in file name order
    Queries(Vec<PackQuery>),
}

/// A single named query within a multi-query pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackQuery {
    pub name: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<ParsedQuery> for PackQuery {
    fn from(parsed: ParsedQuery) -> Self {
        Self {
            name: parsed.name,
            query: parsed.body,
            description: parsed.description,
        }
    }
}

/// Description used for a pack unless a single query supplies its own.
pub fn default_description(folder_label: &str) -> String {
    format!("Queries from {} category", folder_label)
}

/// Build the pack for a folder from its parsed queries.
///
/// Returns `None` when `queries` is empty: such folders produce no pack. One
/// query collapses into a single-query pack that takes over the query's
/// description; two or more keep the folder description and list every query
/// in the given order.
pub fn assemble_pack(
    folder_label: &str,
    mut queries: Vec<ParsedQuery>,
    author: &str,
) -> Option<QueryPack> {
    let mut description = default_description(folder_label);

    let content = match queries.len() {
        0 => return None,
        1 => {
            let single = queries.pop()?;
            if let Some(own) = single.description {
                description = own;
            }
            PackContent::Query(single.body)
        }
        _ => PackContent::Queries(queries.into_iter().map(PackQuery::from).collect()),
    };

    Some(QueryPack {
        name: folder_label.to_string(),
        description,
        author: author.to_string(),
        content,
    })
}

impl QueryPack {
    /// Number of queries carried by the pack.
    pub fn query_count(&self) -> usize {
        match &self.content {
            PackContent::Query(_) => 1,
            PackContent::Queries(queries) => queries.len(),
        }
    }

    /// Check the pack before it is written.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.name.trim().is_empty() {
            return Err(PackError::invalid_pack(&self.name, "pack name is empty"));
        }

        match &self.content {
            PackContent::Query(query) => {
                if query.trim().is_empty() {
                    return Err(PackError::invalid_pack(&self.name, "'query' is empty"));
                }
            }
            PackContent::Queries(queries) => {
                if queries.len() < 2 {
                    return Err(PackError::invalid_pack(
                        &self.name,
                        "'queries' must hold at least two entries; use 'query' for one",
                    ));
                }

                let mut seen = HashSet::new();
                for entry in queries {
                    if entry.name.trim().is_empty() {
                        return Err(PackError::invalid_pack(&self.name, "query with empty name"));
                    }
                    if entry.query.trim().is_empty() {
                        return Err(PackError::invalid_pack(
                            &self.name,
                            format!("query '{}' is empty", entry.name),
                        ));
                    }
                    if !seen.insert(entry.name.as_str()) {
                        return Err(PackError::invalid_pack(
                            &self.name,
                            format!("duplicate query name '{}'", entry.name),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
