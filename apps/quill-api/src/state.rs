use std::sync::Arc;

use quill_service::Gateway;

#[derive(Clone)]
pub struct AppState {
	pub gateway: Arc<Gateway>,
}
impl AppState {
	pub fn new(config: &quill_config::Config) -> Self {
		Self::with_gateway(Gateway::from_config(config))
	}

	pub fn with_gateway(gateway: Gateway) -> Self {
		Self { gateway: Arc::new(gateway) }
	}
}
