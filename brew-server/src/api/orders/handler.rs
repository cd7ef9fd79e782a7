//! Order API Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::Value;
use shared::money::{FeeSchedule, PricingConfig, compute_totals, money_eq};
use shared::order::{ORDER_STATUS_PLACED, Order, OrderPayload, TrackQuery, TrackedOrder, lookup_matches};

use crate::core::ServerState;
use crate::db::repository::{RepoError, order};
use crate::utils::validation::validate_order;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// POST /api/orders - 下单
///
/// 请求体按 JSON 值接收, 反序列化失败也以统一错误格式返回。
/// 金额以客户端为准保存, 服务端重新计算后仅记录偏差。
/// 新订单状态一律为 Placed, 忽略客户端传入的 status。
pub async fn create(
    State(state): State<ServerState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<ApiResponse<()>>)> {
    let mut payload: OrderPayload =
        serde_json::from_value(body).map_err(|e| AppError::validation(format!("Invalid order: {e}")))?;
    validate_order(&payload)?;
    payload.status = ORDER_STATUS_PLACED.to_string();
    log_totals_drift(&payload);

    let saved = order::create(state.pool(), &payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::OrderIdExists, msg),
        other => other.into(),
    })?;

    tracing::info!(
        order_id = %saved.payload.order_id,
        fulfillment = %saved.payload.fulfillment_type,
        total = saved.payload.total,
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Order placed successfully"))))
}

/// Client totals are trusted; a mismatch with the server's own figures is only logged
fn log_totals_drift(payload: &OrderPayload) {
    let pricing = PricingConfig::default().with_fee_schedule(FeeSchedule::flat_delivery(payload.delivery_fee));
    let expected = compute_totals(&payload.items, payload.fulfillment_type, &pricing);

    if !money_eq(expected.subtotal, payload.subtotal) || !money_eq(expected.total, payload.total) {
        tracing::warn!(
            order_id = %payload.order_id,
            client_subtotal = payload.subtotal,
            server_subtotal = expected.subtotal,
            client_total = payload.total,
            server_total = expected.total,
            "Order totals differ from server calculation"
        );
    }
}

/// GET /api/orders - 订单列表 (新的在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = order::find_all(state.pool()).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/track?orderId=&phone= - 订单追踪
///
/// 订单号不区分大小写, 电话只比较数字
pub async fn track(
    State(state): State<ServerState>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<ApiResponse<TrackedOrder>>> {
    let found = order::find_by_order_id(state.pool(), &query.order_id).await?;

    match found {
        Some(order) if lookup_matches(&order.payload.order_id, &order.payload.phone, &query) => {
            Ok(Json(ApiResponse::success(TrackedOrder::from(&order))))
        }
        _ => Err(AppError::new(ErrorCode::OrderNotFound)),
    }
}
