use tokio::sync::RwLock;

use crate::api::Register;

pub(crate) struct AppState {
    pub(crate) register: RwLock<Register>,
}
