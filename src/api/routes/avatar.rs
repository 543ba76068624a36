//! Avatar image endpoint.

use crate::api::error::{ApiError, ApiResult};
use crate::avatar::{create_avatar, AvatarVariant};
use axum::{
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

/// Query parameters for avatar generation.
#[derive(Debug, Deserialize, Default)]
pub struct AvatarQueryParams {
    pub seed: Option<String>,
    /// `botttsNeutral` or `initials` (default)
    pub variant: Option<String>,
}

pub fn router() -> Router {
    Router::new().route("/avatar", get(get_avatar))
}

/// GET /avatar - Render the SVG for a seed.
async fn get_avatar(Query(params): Query<AvatarQueryParams>) -> ApiResult<Response> {
    let variant = match params.variant.as_deref() {
        None => AvatarVariant::Initials,
        Some(raw) => raw
            .parse::<AvatarVariant>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
    };
    let seed = params.seed.unwrap_or_default();

    let avatar = create_avatar(variant, &seed);

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        avatar.into_svg(),
    )
        .into_response())
}
