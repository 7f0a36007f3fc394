use axum::{
  extract::{rejection::PathRejection, Path, State},
  Json,
};

use crate::{
  error::AppError,
  prices::{
      model::{PriceList, PriceQuote},
      service::PricesService,
  },
};

pub async fn get_prices(
  State(service): State<PricesService>,
) -> Result<Json<PriceList>, AppError> {
  let prices = service.fetch_prices().await?;
  Ok(Json(prices))
}

pub async fn get_price_by_id(
  State(service): State<PricesService>,
  id: Result<Path<String>, PathRejection>,
) -> Result<Json<PriceQuote>, AppError> {
  // An id that does not decode to UTF-8 cannot name any symbol
  let Path(id) = id.map_err(|e| AppError::NotFoundError(e.body_text()))?;

  let price = match service.get_price(&id).await {
      Ok(price) => price,
      Err(err @ AppError::ValidationError(_)) => return Err(err),
      // Upstream and decode failures read as "not found" on this route
      Err(err) => return Err(AppError::NotFoundError(err.to_string())),
  };

  Ok(Json(PriceQuote {
      id: id.trim().to_lowercase(),
      price,
  }))
}
