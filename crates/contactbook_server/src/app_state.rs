use std::sync::Arc;

use contactbook_core::Clock;

use crate::store::ContactStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContactStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: ContactStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Arc::new(store),
            clock,
        }
    }
}
