//! Resource HTTP Routes
//!
//! One list route and one get-by-id route per collection:
//!
//! - `POST /api/news`, `POST /api/events` - filtered, paginated list
//! - `GET /api/news/{id}`, `GET /api/events/{id}` - single record or `null`
//!
//! Bodies may be JSON or urlencoded forms. Store failures become 400 with
//! the store's message.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::query::{Collection, ListEnvelope, ListParams, QueryBuilder, SingleEnvelope};
use crate::store::{PreparedQuery, QueryOutput};

use super::auth_gate::AuthenticatedUser;
use super::body::parse_fields;
use super::error::{ApiError, ApiResult};
use super::state::AppState;

type ListQuery = Result<Query<HashMap<String, String>>, QueryRejection>;

/// Routes for every collection, to be nested under `/api`
pub fn resource_routes() -> Router<AppState> {
    Collection::ALL
        .into_iter()
        .fold(Router::new(), |router, collection| {
            router
                .route(
                    &format!("/{}", collection.path()),
                    post(
                        move |State(state): State<AppState>,
                              Extension(user): Extension<AuthenticatedUser>,
                              query: ListQuery,
                              headers: HeaderMap,
                              body: Result<Bytes, BytesRejection>| async move {
                            let Query(query) = query?;
                            let fields = parse_fields(&headers, &body?)?;
                            list_records(state, collection, user, query, fields).await
                        },
                    ),
                )
                .route(
                    &format!("/{}/{{id}}", collection.path()),
                    get(
                        move |State(state): State<AppState>,
                              Extension(user): Extension<AuthenticatedUser>,
                              id: Result<Path<String>, PathRejection>| async move {
                            let Path(id) = id?;
                            get_record(state, collection, user, id).await
                        },
                    ),
                )
        })
}

async fn list_records(
    state: AppState,
    collection: Collection,
    user: AuthenticatedUser,
    query: HashMap<String, String>,
    fields: Map<String, Value>,
) -> ApiResult<Json<ListEnvelope>> {
    let params = ListParams::from_sources(&fields, &query);
    debug!(
        collection = collection.path(),
        user = user.email(),
        ?params,
        "list request"
    );

    if !state.list_delay.is_zero() {
        tokio::time::sleep(state.list_delay).await;
    }

    let paged = QueryBuilder::new(collection, state.limits).list(&params);
    let output = run(&state, collection, &paged.query).await?;

    Ok(Json(ListEnvelope::new(
        output.rows,
        paged.page,
        paged.limit,
        output.count,
    )))
}

async fn get_record(
    state: AppState,
    collection: Collection,
    user: AuthenticatedUser,
    id: String,
) -> ApiResult<Json<SingleEnvelope>> {
    debug!(
        collection = collection.path(),
        user = user.email(),
        %id,
        "get request"
    );

    let query = QueryBuilder::new(collection, state.limits).by_id(&id);
    let output = run(&state, collection, &query).await?;

    Ok(Json(SingleEnvelope::from_rows(output.rows)))
}

async fn run(
    state: &AppState,
    collection: Collection,
    query: &PreparedQuery,
) -> ApiResult<QueryOutput> {
    state.store.execute(query).await.map_err(|e| {
        warn!(
            collection = collection.path(),
            backend = state.store.backend_name(),
            error = %e,
            "store query failed"
        );
        ApiError::Store(e)
    })
}
