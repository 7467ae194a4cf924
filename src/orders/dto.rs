use serde::Deserialize;

/// Body of `POST /checkout`; a previously serialized order is accepted as-is.
#[derive(Debug, Deserialize)]
pub struct CheckoutPayload {
    pub cart_item: Option<i64>,
}
