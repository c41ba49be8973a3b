use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::get_book,
        api::auth::register,
        api::auth::login,
        api::donations::create_donation,
        api::pdfs::list_pdfs,
    ),
    components(schemas(api::auth::RegisterRequest, api::auth::LoginRequest)),
    tags(
        (name = "bookshare", description = "Bookshare storefront API")
    )
)]
pub struct ApiDoc;
