use axum::{routing::get, Router};

use crate::prices::{handler, service::PricesService};

pub fn price_routes(service: PricesService) -> Router {
  Router::new()
      .route("/prices", get(handler::get_prices))
      .route("/prices/:id", get(handler::get_price_by_id))
      .with_state(service)
}
