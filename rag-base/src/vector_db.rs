//! Qdrant vector DB helpers: connection, versioned collections, alias swap,
//! batched upserts, and top-K search using the builder `qdrant_client` API.
//!
//! Keep the vector-store concerns isolated and easy to replace:
//! - Connect to Qdrant over gRPC (`qdrant_client::Qdrant`); alias changes go
//!   over REST, which accepts several actions in one request.
//! - Create a versioned collection with the right dim/metric.
//! - Upsert points in batches (numeric id + dense vector + payload).
//! - Re-point the public alias to the new collection in one request.
//! - Perform k-NN search against the alias.
//!
//! This module does **not** read chunk files or create embeddings, only DB I/O.

use std::collections::HashMap;

use qdrant_client::qdrant::{
    AliasOperations, ChangeAliases, CreateAlias, CreateCollectionBuilder, DeleteAlias, Distance,
    PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder, alias_operations,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::{Value as JsonValue, json};
use tracing::{debug, warn};

use crate::errors::rag_base_error::RagBaseError;
use crate::structs::rag_base_config::{DistanceMetric, RagConfig};
use crate::structs::rag_store::{ChunkPayload, SearchHit};

/// Establish a gRPC connection to Qdrant using `cfg.qdrant.url`.
///
/// This call **does not** touch any collections.
pub async fn connect(cfg: &RagConfig) -> Result<Qdrant, RagBaseError> {
    Qdrant::from_url(&cfg.qdrant.url)
        .build()
        .map_err(|e| RagBaseError::Qdrant(format!("client build: {e}")))
}

/// Name of a fresh versioned collection behind `alias`.
pub fn versioned_collection_name(alias: &str, millis: i64) -> String {
    format!("{alias}_{millis}")
}

/// Create an empty collection with the configured vector size and distance.
pub async fn create_collection(
    client: &Qdrant,
    cfg: &RagConfig,
    name: &str,
) -> Result<(), RagBaseError> {
    let distance = match cfg.qdrant.distance {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Dot => Distance::Dot,
        DistanceMetric::Euclid => Distance::Euclid,
    };

    client
        .create_collection(
            CreateCollectionBuilder::new(name)
                .vectors_config(VectorParamsBuilder::new(cfg.embedding_dim as u64, distance)),
        )
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("create_collection {name}: {e}")))?;

    Ok(())
}

/// Best-effort delete: errors are logged, never returned.
pub async fn delete_collection_quiet(client: &Qdrant, name: &str) {
    if let Err(e) = client.delete_collection(name).await {
        warn!(collection = name, error = %e, "delete_collection failed (ignored)");
    }
}

/// Collection the alias currently points to, if the alias exists.
pub async fn alias_target(client: &Qdrant, alias: &str) -> Result<Option<String>, RagBaseError> {
    let resp = client
        .list_aliases()
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("list_aliases: {e}")))?;

    Ok(resp
        .aliases
        .into_iter()
        .find(|a| a.alias_name == alias)
        .map(|a| a.collection_name))
}

/// True when a real collection (not an alias) carries `name`.
pub async fn plain_collection_exists(client: &Qdrant, name: &str) -> Result<bool, RagBaseError> {
    let resp = client
        .list_collections()
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("list_collections: {e}")))?;

    Ok(resp.collections.iter().any(|c| c.name == name))
}

/// Alias changes that re-point `alias` at `collection`, delete first.
///
/// No delete is emitted when the alias does not exist yet.
pub fn alias_actions(alias: &str, collection: &str, alias_exists: bool) -> ChangeAliases {
    let mut actions = Vec::with_capacity(2);
    if alias_exists {
        actions.push(AliasOperations {
            action: Some(alias_operations::Action::DeleteAlias(DeleteAlias {
                alias_name: alias.to_string(),
            })),
        });
    }
    actions.push(AliasOperations {
        action: Some(alias_operations::Action::CreateAlias(CreateAlias {
            collection_name: collection.to_string(),
            alias_name: alias.to_string(),
        })),
    });

    ChangeAliases {
        actions,
        timeout: None,
    }
}

/// REST body for `POST /collections/aliases`.
pub(crate) fn change_aliases_body(change: &ChangeAliases) -> JsonValue {
    let actions: Vec<JsonValue> = change
        .actions
        .iter()
        .filter_map(|op| match op.action.as_ref()? {
            alias_operations::Action::CreateAlias(c) => Some(json!({
                "create_alias": {
                    "collection_name": c.collection_name,
                    "alias_name": c.alias_name,
                }
            })),
            alias_operations::Action::DeleteAlias(d) => Some(json!({
                "delete_alias": { "alias_name": d.alias_name }
            })),
            alias_operations::Action::RenameAlias(r) => Some(json!({
                "rename_alias": {
                    "old_alias_name": r.old_alias_name,
                    "new_alias_name": r.new_alias_name,
                }
            })),
        })
        .collect();

    json!({ "actions": actions })
}

/// Atomically point `alias` at `collection`.
///
/// Delete and create travel in one REST alias-change request, so searches
/// see either the previous or the new collection and never a missing alias.
pub async fn swap_alias(
    http: &reqwest::Client,
    cfg: &RagConfig,
    collection: &str,
    alias_exists: bool,
) -> Result<(), RagBaseError> {
    let alias = cfg.qdrant.collection.as_str();
    let url = format!(
        "{}/collections/aliases",
        cfg.qdrant.rest_url.trim_end_matches('/')
    );
    let body = change_aliases_body(&alias_actions(alias, collection, alias_exists));

    let resp = http
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("update aliases {alias} -> {collection}: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        return Err(RagBaseError::Qdrant(format!(
            "update aliases {alias} -> {collection}: HTTP {status}: {txt}"
        )));
    }

    debug!(alias, collection, "alias swapped");
    Ok(())
}

/// Convert a [`ChunkPayload`] to Qdrant [`Payload`].
fn payload_to_qdrant(payload: &ChunkPayload) -> Result<Payload, RagBaseError> {
    let as_json = serde_json::to_value(payload)?;
    as_json
        .try_into()
        .map_err(|e| RagBaseError::Qdrant(format!("payload convert: {e}")))
}

/// Upsert a batch of points: `(point_id, vector, payload)`.
///
/// The vector **length must equal** `cfg.embedding_dim`. Returns the number
/// of upserted points.
pub async fn upsert_batch(
    client: &Qdrant,
    cfg: &RagConfig,
    collection: &str,
    batch: Vec<(u64, Vec<f32>, ChunkPayload)>,
) -> Result<usize, RagBaseError> {
    if batch.is_empty() {
        return Ok(0);
    }

    let dim = cfg.embedding_dim;
    let mut points: Vec<PointStruct> = Vec::with_capacity(batch.len());

    for (id, vector, payload) in batch {
        if vector.len() != dim {
            return Err(RagBaseError::InvalidConfig(format!(
                "vector length {} != EMBEDDING_DIM {} for point {}",
                vector.len(),
                dim,
                id
            )));
        }
        points.push(PointStruct::new(id, vector, payload_to_qdrant(&payload)?));
    }

    let point_len = points.len();

    client
        .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("upsert_points: {e}")))?;

    Ok(point_len)
}

/// Run k-NN search for a **query vector** against the alias.
pub async fn search_top_k(
    client: &Qdrant,
    cfg: &RagConfig,
    query_vec: Vec<f32>,
    k: usize,
) -> Result<Vec<SearchHit>, RagBaseError> {
    if query_vec.len() != cfg.embedding_dim {
        return Err(RagBaseError::InvalidConfig(format!(
            "query vector length {} != EMBEDDING_DIM {}",
            query_vec.len(),
            cfg.embedding_dim
        )));
    }

    let builder = SearchPointsBuilder::new(&cfg.qdrant.collection, query_vec, k as u64)
        .with_payload(true);

    let resp = client
        .search_points(builder)
        .await
        .map_err(|e| RagBaseError::Qdrant(format!("search_points: {e}")))?;

    Ok(resp
        .result
        .into_iter()
        .map(|sp| {
            let payload: HashMap<String, JsonValue> = sp
                .payload
                .into_iter()
                .map(|(k, v)| (k, v.into_json()))
                .collect();
            hit_from_payload(sp.score, &payload)
        })
        .collect())
}

/// Build a [`SearchHit`] from a JSON payload, tolerating missing fields.
pub(crate) fn hit_from_payload(score: f32, payload: &HashMap<String, JsonValue>) -> SearchHit {
    let text = |key: &str| {
        payload
            .get(key)
            .and_then(JsonValue::as_str)
            .map(str::to_owned)
    };

    SearchHit {
        score,
        id: text("id").unwrap_or_default(),
        title: text("title").filter(|t| !t.trim().is_empty()),
        content: text("content").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_fields_are_read_best_effort() {
        let mut payload = HashMap::new();
        payload.insert("id".to_string(), json!("rolety"));
        payload.insert("title".to_string(), json!("Rolety zewnętrzne"));
        payload.insert("content".to_string(), json!("Rolety podtynkowe i nadstawne."));
        payload.insert("char_count".to_string(), json!(30));

        let hit = hit_from_payload(0.87, &payload);
        assert_eq!(hit.id, "rolety");
        assert_eq!(hit.title.as_deref(), Some("Rolety zewnętrzne"));
        assert_eq!(hit.content, "Rolety podtynkowe i nadstawne.");

        let bare = hit_from_payload(0.1, &HashMap::new());
        assert_eq!(bare.title, None);
        assert!(bare.content.is_empty());
    }

    #[test]
    fn alias_swap_deletes_before_create() {
        let change = alias_actions("wafam_knowledge", "wafam_knowledge_42", true);
        assert_eq!(change.actions.len(), 2);
        assert!(matches!(
            change.actions[0].action,
            Some(alias_operations::Action::DeleteAlias(ref d)) if d.alias_name == "wafam_knowledge"
        ));
        assert!(matches!(
            change.actions[1].action,
            Some(alias_operations::Action::CreateAlias(ref c))
                if c.alias_name == "wafam_knowledge" && c.collection_name == "wafam_knowledge_42"
        ));

        assert_eq!(
            change_aliases_body(&change),
            json!({"actions": [
                {"delete_alias": {"alias_name": "wafam_knowledge"}},
                {"create_alias": {
                    "collection_name": "wafam_knowledge_42",
                    "alias_name": "wafam_knowledge"
                }}
            ]})
        );
    }

    #[test]
    fn first_build_only_creates_the_alias() {
        let change = alias_actions("wafam_knowledge", "wafam_knowledge_7", false);
        assert_eq!(change.actions.len(), 1);
        assert!(matches!(
            change.actions[0].action,
            Some(alias_operations::Action::CreateAlias(_))
        ));
        assert_eq!(
            change_aliases_body(&change)["actions"][0]["create_alias"]["collection_name"],
            "wafam_knowledge_7"
        );
    }

    #[test]
    fn versioned_names_hang_off_the_alias() {
        assert_eq!(
            versioned_collection_name("wafam_knowledge", 1_700_000_000_000),
            "wafam_knowledge_1700000000000"
        );
    }
}
