use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::Controller;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: u64,
    pub item: String,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateReq {
    item: String,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct GetReq {
    id: u64,
}

/// In-memory order book: `create`, `get`, `list`.
#[derive(Default)]
pub struct OrdersController {
    orders: DashMap<u64, Order>,
    next_id: AtomicU64,
}

impl OrdersController {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&self, body: Value) -> ApiResult<Value> {
        let req: CreateReq = parse(body)?;
        if req.item.trim().is_empty() {
            return Err(ApiError::Validation("item must not be empty".into()));
        }
        if req.quantity == 0 {
            return Err(ApiError::Validation("quantity must be positive".into()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let order = Order {
            id,
            item: req.item,
            quantity: req.quantity,
        };
        self.orders.insert(id, order.clone());
        to_value(&order)
    }

    fn get(&self, body: Value) -> ApiResult<Value> {
        let req: GetReq = parse(body)?;
        let order = self
            .orders
            .get(&req.id)
            .map(|o| o.value().clone())
            .ok_or_else(|| ApiError::NotFound(format!("order {}", req.id)))?;
        to_value(&order)
    }

    fn list(&self) -> ApiResult<Value> {
        let mut all: Vec<Order> = self.orders.iter().map(|o| o.value().clone()).collect();
        all.sort_by_key(|o| o.id);
        to_value(&all)
    }
}

#[async_trait]
impl Controller for OrdersController {
    fn path(&self) -> &'static str {
        "orders"
    }

    fn name(&self) -> &'static str {
        "OrdersController"
    }

    fn handlers(&self) -> &'static [&'static str] {
        &["create", "get", "list"]
    }

    async fn handle(&self, handler: &'static str, body: Value) -> ApiResult<Value> {
        match handler {
            "create" => self.create(body),
            "get" => self.get(body),
            "list" => self.list(),
            other => Err(ApiError::NotFound(format!("orders.{other}"))),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| ApiError::Validation(format!("invalid body: {e}")))
}

fn to_value<T: Serialize>(v: &T) -> ApiResult<Value> {
    serde_json::to_value(v).map_err(|e| ApiError::Internal(format!("encode failed: {e}")))
}
