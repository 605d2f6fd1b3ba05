use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct PersonDoc {
    pub id: i64,
    pub nome: String,
    pub cognome: String,
    pub codice_fiscale: String,
}

#[derive(ToSchema)]
pub struct CountDoc {
    pub count: usize,
}

#[derive(ToSchema)]
pub struct MessageDoc {
    pub message: String,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::items::create_item,
        crate::routes::items::list_items,
        crate::routes::items::get_item,
        crate::routes::items::update_item,
        crate::routes::items::delete_item,
        crate::routes::items::count_items,
    ),
    components(
        schemas(
            HealthResponse,
            PersonDoc,
            CountDoc,
            MessageDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "items")
    )
)]
pub struct ApiDoc;
