use serde_json::{json, Value};

use crate::{
    chain::{DynamicFieldPage, MoveCallParams, SuiRpcClient},
    config::Config,
    constants::{
        ADDRESS_PREFIX, ADMIN_CAP_ID, CONFIG_OBJECT_ID, EVENTS_PARENT_ID, PACKAGE_ID,
        PUBLISHER_ID, STAMP_MODULE,
    },
    error::Error,
    loader::normalize_address,
    signer::SuiSigner,
};

pub struct AdminContext<'a> {
    pub client: &'a SuiRpcClient,
    pub signer: &'a SuiSigner,
    pub config: &'a Config,
}

impl AdminContext<'_> {
    /// Builds, signs and submits a single Move call, honoring dry-run mode.
    /// Returns the transaction digest on success.
    async fn submit(&self, call: MoveCallParams) -> Result<String, Error> {
        let tx = self
            .client
            .move_call(self.signer.address(), &call, self.config.gas_budget)
            .await?;

        let response = if self.config.dry_run {
            self.client.dry_run(&tx.tx_bytes).await?
        } else {
            let signature = self.signer.sign_tx_bytes(&tx.tx_bytes)?;
            self.client.execute(&tx.tx_bytes, &signature).await?
        };

        if !response.is_success() {
            return Err(Error::submission(response.failure_reason()));
        }

        Ok(response.digest.unwrap_or_else(|| "dry-run".to_string()))
    }
}

fn require(value: &str, what: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::configuration(format!("{what} is required")));
    }
    Ok(())
}

fn require_address(value: &str, what: &str) -> Result<(), Error> {
    require(value, what)?;
    if !value.starts_with(ADDRESS_PREFIX) {
        return Err(Error::configuration(format!(
            "{what} must start with {ADDRESS_PREFIX}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub collection_type: String,
}

impl NewCollection {
    pub fn validate(&self) -> Result<(), Error> {
        require(&self.collection_type, "collection type")
    }

    pub async fn execute(&self, ctx: &AdminContext<'_>) -> Result<String, Error> {
        self.validate()?;
        ctx.submit(MoveCallParams {
            package_object_id: PACKAGE_ID.to_string(),
            module: STAMP_MODULE.to_string(),
            function: "new_collection".to_string(),
            type_arguments: vec![self.collection_type.clone()],
            arguments: vec![json!(CONFIG_OBJECT_ID), json!(PUBLISHER_ID)],
        })
        .await
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), Error> {
        require(&self.name, "event name")
    }

    pub async fn execute(&self, ctx: &AdminContext<'_>) -> Result<String, Error> {
        self.validate()?;
        ctx.submit(MoveCallParams {
            package_object_id: PACKAGE_ID.to_string(),
            module: STAMP_MODULE.to_string(),
            function: "new_event".to_string(),
            type_arguments: vec![],
            arguments: vec![
                json!(CONFIG_OBJECT_ID),
                json!(ADMIN_CAP_ID),
                json!(&self.name),
                json!(&self.description),
                json!(&self.image_url),
            ],
        })
        .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerAction {
    Add,
    Remove,
}

#[derive(Debug, Clone)]
pub struct ManagerUpdate {
    pub manager: String,
    pub action: ManagerAction,
}

impl ManagerUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        require_address(&self.manager, "manager address")
    }

    pub async fn execute(&self, ctx: &AdminContext<'_>) -> Result<String, Error> {
        self.validate()?;

        let function = match self.action {
            ManagerAction::Add => "add_manager",
            ManagerAction::Remove => "remove_manager",
        };

        ctx.submit(MoveCallParams {
            package_object_id: PACKAGE_ID.to_string(),
            module: STAMP_MODULE.to_string(),
            function: function.to_string(),
            type_arguments: vec![],
            arguments: vec![
                json!(CONFIG_OBJECT_ID),
                json!(ADMIN_CAP_ID),
                json!(normalize_address(&self.manager)),
            ],
        })
        .await
    }
}

#[derive(Debug, Clone)]
pub struct MintTo {
    pub collection_type: String,
    pub event_name: String,
    pub recipient: String,
}

impl MintTo {
    pub fn validate(&self) -> Result<(), Error> {
        require(&self.collection_type, "collection type")?;
        require(&self.event_name, "event name")?;
        require_address(&self.recipient, "recipient address")
    }

    pub async fn execute(&self, ctx: &AdminContext<'_>) -> Result<String, Error> {
        self.validate()?;
        ctx.submit(MoveCallParams {
            package_object_id: PACKAGE_ID.to_string(),
            module: STAMP_MODULE.to_string(),
            function: "mint_to".to_string(),
            type_arguments: vec![self.collection_type.clone()],
            arguments: vec![
                json!(CONFIG_OBJECT_ID),
                json!(&self.event_name),
                json!(normalize_address(&self.recipient)),
            ],
        })
        .await
    }
}

/// Reference data fetched from chain state for selection and sanity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub name: String,
    pub id: String,
}

pub fn parse_collections(object: &Value) -> Vec<Registered> {
    object
        .pointer("/data/content/fields/registered_collections/fields/contents")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let name = entry.pointer("/fields/key/fields/name")?.as_str()?;
                    let id = entry.pointer("/fields/value")?.as_str()?;
                    Some(Registered {
                        name: name.to_string(),
                        id: id.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_events(page: &DynamicFieldPage) -> Vec<Registered> {
    page.data
        .iter()
        .filter_map(|field| {
            let name = field.name.value.as_str()?;
            Some(Registered {
                name: name.to_string(),
                id: field.object_id.clone(),
            })
        })
        .collect()
}

pub async fn fetch_collections(client: &SuiRpcClient) -> Result<Vec<Registered>, Error> {
    let object = client.get_object(CONFIG_OBJECT_ID).await?;
    Ok(parse_collections(&object))
}

pub async fn fetch_events(client: &SuiRpcClient) -> Result<Vec<Registered>, Error> {
    let mut events = vec![];
    let mut cursor: Option<Value> = None;

    loop {
        let page = client
            .get_dynamic_fields(EVENTS_PARENT_ID, cursor.as_ref())
            .await?;
        events.extend(parse_events(&page));

        if !page.has_next_page || page.next_cursor.is_none() {
            break;
        }
        cursor = page.next_cursor;
    }

    Ok(events)
}

/// Lists the stamps of one collection owned by `owner`.
pub async fn fetch_stamps(
    client: &SuiRpcClient,
    owner: &str,
    collection_type: &str,
) -> Result<Vec<Value>, Error> {
    let struct_type = format!("{PACKAGE_ID}::{STAMP_MODULE}::Stamp<{collection_type}>");
    let page = client
        .get_owned_objects(&normalize_address(owner), &struct_type)
        .await?;

    Ok(page
        .pointer("/data")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_to_requires_all_fields() {
        let op = MintTo {
            collection_type: String::new(),
            event_name: "Launch".to_string(),
            recipient: "0xaa".to_string(),
        };
        assert!(matches!(op.validate(), Err(Error::Configuration(_))));

        let op = MintTo {
            collection_type: "0x2::foo::Bar".to_string(),
            event_name: "Launch".to_string(),
            recipient: "not-an-address".to_string(),
        };
        assert!(matches!(op.validate(), Err(Error::Configuration(_))));

        let op = MintTo {
            collection_type: "0x2::foo::Bar".to_string(),
            event_name: "Launch".to_string(),
            recipient: "0xaa".to_string(),
        };
        assert!(op.validate().is_ok());
    }

    #[test]
    fn manager_update_rejects_blank_address() {
        let op = ManagerUpdate {
            manager: "  ".to_string(),
            action: ManagerAction::Add,
        };
        assert!(matches!(op.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn collections_parse_from_vec_map_contents() {
        let object = serde_json::json!({
            "data": {
                "content": {
                    "fields": {
                        "registered_collections": {
                            "fields": {
                                "contents": [
                                    {
                                        "fields": {
                                            "key": { "fields": { "name": "0xa::collections::VipPass" } },
                                            "value": "0xcafe"
                                        }
                                    }
                                ]
                            }
                        }
                    }
                }
            }
        });

        let parsed = parse_collections(&object);
        assert_eq!(
            parsed,
            vec![Registered {
                name: "0xa::collections::VipPass".to_string(),
                id: "0xcafe".to_string(),
            }]
        );
    }

    #[test]
    fn missing_collection_registry_parses_to_empty() {
        assert!(parse_collections(&serde_json::json!({})).is_empty());
    }

    #[test]
    fn events_parse_from_dynamic_fields() {
        let page: DynamicFieldPage = serde_json::from_value(serde_json::json!({
            "data": [
                { "name": { "value": "Launch Party" }, "objectId": "0xbeef" }
            ],
            "hasNextPage": false
        }))
        .unwrap();

        let parsed = parse_events(&page);
        assert_eq!(parsed[0].name, "Launch Party");
        assert_eq!(parsed[0].id, "0xbeef");
    }
}
