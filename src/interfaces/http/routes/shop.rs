//! `/shop/api`: members, products and purchases.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};

use crate::application::bootstrap::AppServices;
use crate::application::shop::{LoginRequest, MemberRequest, ProductRequest, PurchaseRequest};
use crate::domain::shop::{MemberResponse, MemberWithProducts, Product, PurchaseResponse};
use crate::domain::validation::require_id;
use crate::interfaces::http::envelope::Envelope;
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::extract::{ApiJson, ApiPath};

type Created<T> = (StatusCode, Envelope<T>);

pub fn router() -> Router<AppServices> {
    Router::new()
        .route("/members", get(list_members).post(create_member))
        .route("/members/login", post(login))
        .route(
            "/members/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/members/{id}/purchases", get(member_with_purchases))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/purchases", get(list_purchases).post(create_purchase))
        .route("/purchases/{id}", get(get_purchase))
        .route("/purchases/member/{member_id}", get(member_purchases))
        .route("/purchases/product/{product_id}", get(product_purchases))
}

async fn list_members(State(app): State<AppServices>) -> ApiResult<Envelope<Vec<MemberResponse>>> {
    Ok(Envelope::ok(app.members.list_members().await?))
}

async fn get_member(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<MemberResponse>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.members.get_member(id).await?))
}

async fn create_member(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<MemberRequest>,
) -> ApiResult<Created<MemberResponse>> {
    Ok(Envelope::created(app.members.create_member(request).await?))
}

async fn update_member(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<MemberRequest>,
) -> ApiResult<Envelope<MemberResponse>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.members.update_member(id, request).await?))
}

async fn delete_member(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<()>> {
    let id = require_id("id", id)?;
    app.members.delete_member(id).await?;
    Ok(Envelope::done("Member deleted"))
}

async fn member_with_purchases(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<MemberWithProducts>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.members.member_with_purchases(id).await?))
}

async fn login(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Envelope<MemberResponse>> {
    Ok(Envelope::ok(app.members.login(request).await?))
}

async fn list_products(State(app): State<AppServices>) -> ApiResult<Envelope<Vec<Product>>> {
    Ok(Envelope::ok(app.products.list_products().await?))
}

async fn get_product(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<Product>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.products.get_product(id).await?))
}

async fn create_product(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<Created<Product>> {
    Ok(Envelope::created(app.products.create_product(request).await?))
}

async fn update_product(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> ApiResult<Envelope<Product>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.products.update_product(id, request).await?))
}

async fn delete_product(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<()>> {
    let id = require_id("id", id)?;
    app.products.delete_product(id).await?;
    Ok(Envelope::done("Product deleted"))
}

async fn list_purchases(State(app): State<AppServices>) -> ApiResult<Envelope<Vec<PurchaseResponse>>> {
    Ok(Envelope::ok(app.purchases.list_purchases().await?))
}

async fn get_purchase(
    State(app): State<AppServices>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Envelope<PurchaseResponse>> {
    let id = require_id("id", id)?;
    Ok(Envelope::ok(app.purchases.get_purchase(id).await?))
}

async fn create_purchase(
    State(app): State<AppServices>,
    ApiJson(request): ApiJson<PurchaseRequest>,
) -> ApiResult<Created<PurchaseResponse>> {
    Ok(Envelope::created(app.purchases.create_purchase(request).await?))
}

async fn member_purchases(
    State(app): State<AppServices>,
    ApiPath(member_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<PurchaseResponse>>> {
    let member_id = require_id("memberId", member_id)?;
    Ok(Envelope::ok(app.purchases.member_purchases(member_id).await?))
}

async fn product_purchases(
    State(app): State<AppServices>,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<Envelope<Vec<PurchaseResponse>>> {
    let product_id = require_id("productId", product_id)?;
    Ok(Envelope::ok(app.purchases.product_purchases(product_id).await?))
}
