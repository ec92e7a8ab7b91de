pub mod api_server;
pub mod cat_api;
pub mod postgres;

pub use api_server::start_api_server;
pub use cat_api::CatApiClient;
pub use postgres::PostgresStore;
