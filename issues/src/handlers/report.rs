use actix_web::{
    get,
    web::{self, Json},
};
use common::{context::Context, entities::report::PublicReport, error};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::service::report::ReportService;

#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AllReportsQuery {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
}

#[utoipa::path(
    params(
        ("Authorization" = String, Header,  description = "Bearer token"),
        AllReportsQuery,
    ),
    responses(
        (status = 200, description = "Report log", body = [PublicReport]),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[get("/api/reports")]
pub async fn get_reports(
    context: Context,
    query: web::Query<AllReportsQuery>,
) -> error::Result<Json<Vec<PublicReport>>> {
    Ok(Json(
        ReportService::new(context)
            .list_all(query.skip, query.limit)
            .await?,
    ))
}
