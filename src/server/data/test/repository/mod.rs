use crate::server::{
    data::{
        filter::{Filter, FindOptions, Pipeline, SortDirection, Update},
        object_id::ObjectId,
        repository::Repository,
        store::Store,
    },
    error::store::StoreError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use test_utils::builder::TestBuilder;

mod count;
mod delete;
mod insert;
mod timeout;
mod update;

const NAMESPACE: &str = "test";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    qty: i64,
}

fn item(name: &str, qty: i64) -> Item {
    Item {
        id: None,
        name: name.to_string(),
        qty,
    }
}
